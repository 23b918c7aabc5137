use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::Ring;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SidewalkID(pub i64);

impl fmt::Display for SidewalkID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sidewalk #{}", self.0)
    }
}

/// A time-of-day bucket, keyed by the hour, like "9" for 9 AM. Whatever buckets the source data
/// carries are the ones that exist; none is mandatory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeBucket(String);

impl TimeBucket {
    pub fn new<S: Into<String>>(key: S) -> TimeBucket {
        TimeBucket(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

/// One sidewalk polygon and everything known about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sidewalk {
    pub id: SidewalkID,
    /// The shape currently displayed.
    pub ring: Ring,
    /// The shape before any width edits, captured the first time this sidewalk is edited and
    /// never changed after.
    pub original_ring: Option<Ring>,
    pub props: SidewalkProps,
    /// Mirrors the controller's selection; at most one sidewalk store-wide has this set.
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SidewalkProps {
    pub est_width_ft: f64,
    /// Captured alongside `original_ring` on first edit.
    pub original_width_ft: Option<f64>,
    /// Width edits never change the length. Missing for some source features.
    pub est_length_ft: Option<f64>,
    /// Always est_width_ft * est_length_ft when the length is known.
    pub est_area_ft: f64,
    /// Pedestrians per hour by time bucket. External input; nothing here modifies it.
    pub pedestrian_total: BTreeMap<TimeBucket, f64>,
    /// Square feet per pedestrian by time bucket, derived from est_area_ft.
    pub area_per_person: BTreeMap<TimeBucket, f64>,
    /// Where the pedestrians come from, by time bucket. Display-only.
    pub breakdown: BTreeMap<TimeBucket, PedestrianBreakdown>,
}

/// Hourly pedestrian counts attributed to nearby generators.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PedestrianBreakdown {
    pub queue: f64,
    pub restaurant: f64,
    pub supermarket: f64,
    pub pharmacy: f64,
    pub bank: f64,
    pub office: f64,
    pub subway: f64,
}

impl Sidewalk {
    /// Square feet per pedestrian for one bucket, if it's ever been computed for that bucket.
    pub fn area_per_person(&self, bucket: &TimeBucket) -> Option<f64> {
        self.props.area_per_person.get(bucket).copied()
    }

    /// Pedestrians per hour for one bucket, 0 for buckets the source didn't cover.
    pub fn pedestrian_total(&self, bucket: &TimeBucket) -> f64 {
        self.props
            .pedestrian_total
            .get(bucket)
            .copied()
            .unwrap_or(0.0)
    }

    /// A human-readable summary for tooltips. All numbers come from the current edited state;
    /// callers never need to re-derive anything.
    pub fn describe(&self, bucket: &TimeBucket) -> String {
        let mut lines = vec![
            format!("Sidewalk area: {:.1} sqft", self.props.est_area_ft),
            format!("Sidewalk width: {:.1} ft", self.props.est_width_ft),
            match self.area_per_person(bucket) {
                Some(x) => format!("Area per person: {:.1} sqft/person", x),
                None => "Area per person: N/A".to_string(),
            },
            format!(
                "Pedestrian traffic: {} /hr",
                self.pedestrian_total(bucket)
            ),
        ];
        if let Some(b) = self.props.breakdown.get(bucket) {
            lines.push(format!("- Pedestrian queue: {} /hr", b.queue));
            lines.push(format!("- Restaurant/bar: {} /hr", b.restaurant));
            lines.push(format!("- Supermarket: {} /hr", b.supermarket));
            lines.push(format!("- Convenience/pharmacy: {} /hr", b.pharmacy));
            lines.push(format!("- Bank: {} /hr", b.bank));
            lines.push(format!("- Office: {} /hr", b.office));
            lines.push(format!("- Subway: {} /hr", b.subway));
        }
        lines.join("\n")
    }
}
