//! 2D geometry primitives for sidewalk polygons: points, segments, simple rings, and the
//! narrow-axis width scaling that the sidewalk editor is built on.

mod angle;
mod line;
mod pt;
mod ring;

pub use crate::angle::Angle;
pub use crate::line::Line;
pub use crate::pt::Pt2D;
pub use crate::ring::{scale_along_axis, NarrowAxis, Ring};
