//! An in-memory model of sidewalk polygons and pedestrian crowding. The
//! [`EditController`] owns a lazily-loaded cache of sidewalk features, tracks a single
//! selection, and applies width edits: the selected polygon stretches along its narrow axis and
//! the derived crowding numbers (area, area per person by time of day) update to match.
//! Rendering layers just call [`EditController::current_features`] after each change; they never
//! re-derive any of the math.

#[macro_use]
extern crate log;

mod edit;
mod load;
pub mod logger;
mod sidewalk;
mod store;

pub use crate::edit::EditController;
pub use crate::load::{parse_collection, FeatureSource, FileSource};
pub use crate::sidewalk::{PedestrianBreakdown, Sidewalk, SidewalkID, SidewalkProps, TimeBucket};
pub use crate::store::SidewalkStore;
