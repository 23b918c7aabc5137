use std::collections::BTreeSet;

use anyhow::Result;

use crate::load::FeatureSource;
use crate::{Sidewalk, SidewalkID, SidewalkStore, TimeBucket};

/// Owns the sidewalk cache and the one-at-a-time selection, and applies width edits. UI layers
/// are thin adapters translating input events into these calls, then re-rendering from
/// [`EditController::current_features`].
pub struct EditController {
    store: SidewalkStore,
    selected_id: Option<SidewalkID>,
    active_bucket: TimeBucket,
}

impl EditController {
    pub fn new() -> EditController {
        EditController {
            store: SidewalkStore::new(),
            selected_id: None,
            active_bucket: TimeBucket::new("9"),
        }
    }

    /// See [`SidewalkStore::load`]. Until this succeeds, there's nothing to select and every
    /// edit is a no-op.
    pub fn load(&mut self, source: &dyn FeatureSource) -> Result<()> {
        self.store.load(source)
    }

    pub fn store(&self) -> &SidewalkStore {
        &self.store
    }

    pub fn selected_id(&self) -> Option<SidewalkID> {
        self.selected_id
    }

    /// Selecting the current selection again deselects it; selecting anything else moves the
    /// selection there. Every sidewalk's `selected` flag follows.
    pub fn select(&mut self, id: SidewalkID) {
        if self.store.find(id).is_none() {
            warn!("Can't select unknown {}", id);
            return;
        }
        if self.selected_id == Some(id) {
            self.set_selection(None);
        } else {
            self.set_selection(Some(id));
        }
    }

    fn set_selection(&mut self, new: Option<SidewalkID>) {
        if let Some(old) = self.selected_id.take() {
            if let Some(sidewalk) = self.store.find_mut(old) {
                sidewalk.selected = false;
            }
        }
        if let Some(id) = new {
            if let Some(sidewalk) = self.store.find_mut(id) {
                sidewalk.selected = true;
            }
        }
        self.selected_id = new;
    }

    /// Applies a width multiplier to the selected sidewalk: the polygon stretches along its
    /// narrow axis, and the derived crowding numbers update to match. The math always starts
    /// from the shape before any edits, so repeating a multiplier never compounds. Without a
    /// selection, does nothing.
    pub fn set_width_multiplier(&mut self, multiplier: f64) {
        let id = match self.selected_id {
            Some(id) => id,
            None => {
                debug!("No selection, ignoring width multiplier {}", multiplier);
                return;
            }
        };
        if multiplier <= 0.0 {
            warn!(
                "A width multiplier of {} would invert or collapse {}; ignoring",
                multiplier, id
            );
            return;
        }
        let sidewalk = match self.store.find_mut(id) {
            Some(sidewalk) => sidewalk,
            None => {
                return;
            }
        };

        // Capture the pre-edit state the first time this sidewalk is touched. These never
        // change again.
        if sidewalk.original_ring.is_none() {
            sidewalk.original_ring = Some(sidewalk.ring.clone());
        }
        if sidewalk.props.original_width_ft.is_none() {
            sidewalk.props.original_width_ft = Some(sidewalk.props.est_width_ft);
        }
        let original_width = sidewalk
            .props
            .original_width_ft
            .unwrap_or(sidewalk.props.est_width_ft);
        let original_ring = sidewalk
            .original_ring
            .clone()
            .unwrap_or_else(|| sidewalk.ring.clone());

        sidewalk.props.est_width_ft = original_width * multiplier;

        // The length never changes with width, so area follows directly. If the length is
        // unknown, leave the old area and crowding numbers alone rather than guessing.
        if let Some(length) = sidewalk.props.est_length_ft {
            let area = sidewalk.props.est_width_ft * length;
            sidewalk.props.est_area_ft = area;

            let buckets: BTreeSet<TimeBucket> = sidewalk
                .props
                .pedestrian_total
                .keys()
                .chain(sidewalk.props.area_per_person.keys())
                .cloned()
                .collect();
            for bucket in buckets {
                let count = sidewalk
                    .props
                    .pedestrian_total
                    .get(&bucket)
                    .copied()
                    .unwrap_or(0.0);
                // With nobody on the sidewalk, crowding is undefined; report the whole area
                // instead of dividing by zero.
                let per_person = if count > 0.0 { area / count } else { area };
                sidewalk.props.area_per_person.insert(bucket, per_person);
            }
        }

        // A multiplier of exactly 1 means restore the original shape verbatim, not re-derive
        // it and accumulate floating point error.
        sidewalk.ring = if multiplier == 1.0 {
            original_ring
        } else {
            original_ring.scale_width(multiplier)
        };
    }

    /// Puts the selected sidewalk back to exactly its pre-edit shape and numbers.
    pub fn reset_width(&mut self) {
        self.set_width_multiplier(1.0);
    }

    /// Which time-of-day bucket tooltips and rendering should report right now.
    pub fn set_time_bucket(&mut self, bucket: TimeBucket) {
        self.active_bucket = bucket;
    }

    pub fn active_time_bucket(&self) -> &TimeBucket {
        &self.active_bucket
    }

    /// The current state of every sidewalk, safe to hand straight to a rendering layer.
    pub fn current_features(&self) -> Vec<Sidewalk> {
        self.store.all()
    }
}

impl Default for EditController {
    fn default() -> EditController {
        EditController::new()
    }
}
