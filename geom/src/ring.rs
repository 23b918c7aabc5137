use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Line, Pt2D};

/// The boundary of a simple polygon, stored with the first point repeated at the end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last
    pts: Vec<Pt2D>,
}

impl Ring {
    /// Creates a ring from points in order. Open input (last point not repeating the first) is
    /// closed automatically. Fails with fewer than 3 distinct points or with duplicate adjacent
    /// points.
    pub fn new(mut pts: Vec<Pt2D>) -> Result<Ring> {
        if !pts.is_empty() && pts[0] != pts[pts.len() - 1] {
            pts.push(pts[0]);
        }
        if pts.len() < 4 {
            bail!("Can't make a ring with < 3 distinct points: {:?}", pts);
        }
        if pts.windows(2).any(|pair| pair[0] == pair[1]) {
            bail!("Ring has duplicate adjacent points: {:?}", pts);
        }
        Ok(Ring { pts })
    }

    pub fn maybe_new(pts: Vec<Pt2D>) -> Option<Ring> {
        Ring::new(pts).ok()
    }

    /// All points, with the first repeated at the end.
    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    /// The distinct vertices, without the closing point.
    pub fn vertices(&self) -> &[Pt2D] {
        &self.pts[..self.pts.len() - 1]
    }

    pub fn edges(&self) -> Vec<Line> {
        self.pts
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
            .collect()
    }

    /// The arithmetic mean of the vertices. Deliberately not the area-weighted centroid; the
    /// narrow-axis math pivots around this same point, so the two must agree.
    pub fn centroid(&self) -> Pt2D {
        let vertices = self.vertices();
        let mut x = 0.0;
        let mut y = 0.0;
        for pt in vertices {
            x += pt.x();
            y += pt.y();
        }
        let n = vertices.len() as f64;
        Pt2D::new(x / n, y / n)
    }

    /// The direction a narrow strip like a sidewalk is thin in: perpendicular to the edge
    /// closest to the centroid, pointing from that edge's midpoint towards the centroid. Ties
    /// between equally-close edges go to the first one in ring order.
    pub fn narrow_axis(&self) -> NarrowAxis {
        let center = self.centroid();
        let mut closest: Option<(f64, Line)> = None;
        for edge in self.edges() {
            let dist = edge.dist_to_pt(center);
            if closest.map(|(d, _)| dist < d).unwrap_or(true) {
                closest = Some((dist, edge));
            }
        }
        // Rings always have at least 3 edges
        let (_, edge) = closest.unwrap();

        let through = edge.middle();
        // Ring construction rejects zero-length edges, so the perpendicular is well-defined.
        let mut axis = edge.angle().rotate_degs(90.0);
        let (x, y) = axis.to_vector();
        if (center.x() - through.x()) * x + (center.y() - through.y()) * y < 0.0 {
            axis = axis.opposite();
        }
        NarrowAxis { axis, through }
    }

    /// Stretches or squeezes the ring along its narrow axis. A multiplier of exactly 1 returns
    /// an identical copy, skipping the math entirely. Distances along the governing edge are
    /// untouched.
    pub fn scale_width(&self, multiplier: f64) -> Ring {
        if multiplier == 1.0 {
            return self.clone();
        }
        let center = self.centroid();
        let axis = self.narrow_axis().axis;
        Ring {
            pts: scale_along_axis(&self.pts, center, axis, multiplier - 1.0),
        }
    }

    /// Extracts the outer ring of a GeoJSON Polygon. Only the first polygon of a MultiPolygon
    /// is used; holes are ignored.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Ring> {
        let raw_rings = match &geometry.value {
            geojson::Value::Polygon(rings) => rings,
            geojson::Value::MultiPolygon(polygons) => match polygons.first() {
                Some(rings) => rings,
                None => bail!("MultiPolygon is empty"),
            },
            _ => bail!("Unexpected geometry: {:?}", geometry.value),
        };
        let outer = match raw_rings.first() {
            Some(pts) => pts,
            None => bail!("Polygon has no rings"),
        };
        Ring::new(outer.iter().map(|pt| Pt2D::new(pt[0], pt[1])).collect())
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        let pts = self.pts.iter().map(|pt| vec![pt.x(), pt.y()]).collect();
        geojson::Geometry::new(geojson::Value::Polygon(vec![pts]))
    }
}

/// The axis along which a narrow polygon's width varies.
#[derive(Clone, Copy, Debug)]
pub struct NarrowAxis {
    /// Unit direction perpendicular to the governing edge, pointing into the shape.
    pub axis: Angle,
    /// The midpoint of the governing edge.
    pub through: Pt2D,
}

/// Displaces each point along `axis` in proportion to its signed offset from `center`: a
/// `scale_factor` of 0 changes nothing, 0.5 pushes every point half again as far out, -0.5
/// pulls everything halfway in. The component perpendicular to `axis` is untouched. Fewer than
/// 3 points isn't a polygon, so those inputs come back unchanged.
pub fn scale_along_axis(pts: &[Pt2D], center: Pt2D, axis: Angle, scale_factor: f64) -> Vec<Pt2D> {
    if pts.len() < 3 || scale_factor == 0.0 {
        return pts.to_vec();
    }
    let (x, y) = axis.to_vector();
    pts.iter()
        .map(|pt| {
            let projection = (pt.x() - center.x()) * x + (pt.y() - center.y()) * y;
            let displaced = projection * scale_factor;
            pt.offset(displaced * x, displaced * y)
        })
        .collect()
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(0.0, 10.0),
            Pt2D::new(10.0, 10.0),
            Pt2D::new(10.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn construction() {
        // Open input gets closed
        assert_eq!(square().points().len(), 5);

        assert!(Ring::maybe_new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(1.0, 1.0)]).is_none());
        assert!(Ring::maybe_new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(0.0, 0.0),
            Pt2D::new(1.0, 1.0),
            Pt2D::new(0.0, 1.0)
        ])
        .is_none());
    }

    #[test]
    fn centroid_is_vertex_mean() {
        assert_eq!(square().centroid(), Pt2D::new(5.0, 5.0));
    }

    #[test]
    fn narrow_axis_of_strip() {
        // A strip running along x, 10 long and 2 wide. The centroid is closest to the long
        // horizontal edges, so the axis points across the strip, along y.
        let ring = Ring::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(10.0, 2.0),
            Pt2D::new(0.0, 2.0),
        ])
        .unwrap();
        let result = ring.narrow_axis();
        assert!((result.axis.normalized_degrees() - 90.0).abs() < 1e-9);
        assert_eq!(result.through, Pt2D::new(5.0, 0.0));
    }

    #[test]
    fn narrow_axis_points_inward() {
        // Same strip, with the ring wound the other way. The axis must still point from the
        // governing edge towards the centroid.
        let ring = Ring::new(vec![
            Pt2D::new(0.0, 2.0),
            Pt2D::new(10.0, 2.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(0.0, 0.0),
        ])
        .unwrap();
        let result = ring.narrow_axis();
        assert_eq!(result.through, Pt2D::new(5.0, 2.0));
        assert!((result.axis.normalized_degrees() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn scale_width_displaces_across_the_strip() {
        let ring = Ring::new(vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(10.0, 0.0),
            Pt2D::new(10.0, 2.0),
            Pt2D::new(0.0, 2.0),
        ])
        .unwrap();
        let scaled = ring.scale_width(2.0);
        // Every vertex is 1 from the centroid's y of 1, so doubling pushes each 1 further out.
        for (before, after) in ring.points().iter().zip(scaled.points().iter()) {
            assert!((after.x() - before.x()).abs() < 1e-9);
            let expected_y = if before.y() == 0.0 { -1.0 } else { 3.0 };
            assert!((after.y() - expected_y).abs() < 1e-9);
        }
    }

    #[test]
    fn scale_width_multiplier_one_is_exact() {
        let ring = square();
        assert_eq!(ring.scale_width(1.0), ring);
    }

    #[test]
    fn scale_width_never_compounds() {
        let ring = square();
        let once = ring.scale_width(1.5);
        // Scaling the same base ring with the same multiplier is deterministic
        assert_eq!(once, ring.scale_width(1.5));
    }

    #[test]
    fn scale_along_axis_degenerate_input() {
        let axis = Pt2D::new(0.0, 0.0).angle_to(Pt2D::new(1.0, 0.0));
        let center = Pt2D::new(0.0, 0.0);

        let two_pts = vec![Pt2D::new(1.0, 1.0), Pt2D::new(2.0, 2.0)];
        assert_eq!(scale_along_axis(&two_pts, center, axis, 0.5), two_pts);

        let triangle = vec![Pt2D::new(1.0, 0.0), Pt2D::new(2.0, 0.0), Pt2D::new(1.0, 1.0)];
        assert_eq!(scale_along_axis(&triangle, center, axis, 0.0), triangle);
    }

    #[test]
    fn geojson_round_trip() {
        let ring = square();
        let recovered = Ring::from_geojson(&ring.to_geojson()).unwrap();
        assert_eq!(recovered, ring);
    }
}
