use std::collections::BTreeMap;

use anyhow::Result;

use crate::load::{parse_collection, FeatureSource};
use crate::{Sidewalk, SidewalkID};

/// The canonical cache of sidewalk features. Populated once from a [`FeatureSource`]; after
/// that, sidewalks are never added or removed, and only the edit controller mutates them.
pub struct SidewalkStore {
    cache: Option<BTreeMap<SidewalkID, Sidewalk>>,
}

impl SidewalkStore {
    pub fn new() -> SidewalkStore {
        SidewalkStore { cache: None }
    }

    /// Fetches and parses the feature collection the first time; later calls are no-ops. If
    /// the fetch or parse fails, nothing is cached and the next call retries from scratch.
    pub fn load(&mut self, source: &dyn FeatureSource) -> Result<()> {
        if self.cache.is_some() {
            return Ok(());
        }
        let raw = source.fetch()?;
        let mut cache = BTreeMap::new();
        for sidewalk in parse_collection(&raw)? {
            let id = sidewalk.id;
            if cache.insert(id, sidewalk).is_some() {
                warn!("Two features have {}; keeping the last", id);
            }
        }
        self.cache = Some(cache);
        Ok(())
    }

    pub fn loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// An independent copy of every sidewalk, current edits included. Callers can do anything
    /// with the result without touching the cache.
    pub fn all(&self) -> Vec<Sidewalk> {
        match &self.cache {
            Some(cache) => cache.values().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn find(&self, id: SidewalkID) -> Option<&Sidewalk> {
        self.cache.as_ref().and_then(|cache| cache.get(&id))
    }

    // Mutation stays inside this crate; everything else reads snapshots.
    pub(crate) fn find_mut(&mut self, id: SidewalkID) -> Option<&mut Sidewalk> {
        self.cache.as_mut().and_then(|cache| cache.get_mut(&id))
    }
}

impl Default for SidewalkStore {
    fn default() -> SidewalkStore {
        SidewalkStore::new()
    }
}
