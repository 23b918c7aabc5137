use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Angle, Pt2D};

/// A line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn length(&self) -> f64 {
        self.pt1().dist_to(self.pt2())
    }

    pub fn middle(&self) -> Pt2D {
        Pt2D::new(
            (self.pt1().x() + self.pt2().x()) / 2.0,
            (self.pt1().y() + self.pt2().y()) / 2.0,
        )
    }

    pub fn angle(&self) -> Angle {
        self.pt1().angle_to(self.pt2())
    }

    /// The distance from `pt` to the closest point on this segment. If the perpendicular foot
    /// falls past either end, this is the distance to the nearest endpoint. A zero-length
    /// segment is just its one point.
    pub fn dist_to_pt(&self, pt: Pt2D) -> f64 {
        let dx = self.pt2().x() - self.pt1().x();
        let dy = self.pt2().y() - self.pt1().y();
        let len_squared = dx * dx + dy * dy;
        if len_squared == 0.0 {
            return pt.dist_to(self.pt1());
        }
        let t = ((pt.x() - self.pt1().x()) * dx + (pt.y() - self.pt1().y()) * dy) / len_squared;
        let t = t.clamp(0.0, 1.0);
        pt.dist_to(Pt2D::new(self.pt1().x() + t * dx, self.pt1().y() + t * dy))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line({} to {})", self.pt1(), self.pt2())
    }
}
