//! 2D convex cells on a body's face and the operations that turn them into fragments.

use crate::float_types::{EPSILON, Real};
use geo::{Area, Coord, LineString, Polygon as GeoPolygon, Rect};
use nalgebra::{Point2, Vector2};

pub mod extrude;
pub mod voronoi;

/// An ordered, closed ring of 2D points (the closing edge is implicit).
///
/// Every operation that produces a `CellPolygon` keeps it convex as long as
/// its input was convex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellPolygon {
    pub points: Vec<Point2<Real>>,
}

impl CellPolygon {
    pub const fn new(points: Vec<Point2<Real>>) -> Self {
        CellPolygon { points }
    }

    /// The four corners of `rect`, counter-clockwise from its minimum corner.
    pub fn rectangle(rect: &Rect<Real>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        CellPolygon::new(vec![
            Point2::new(min.x, min.y),
            Point2::new(max.x, min.y),
            Point2::new(max.x, max.y),
            Point2::new(min.x, max.y),
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three corners or (almost) no area.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || self.area() <= EPSILON
    }

    /// Clips the polygon against the half-plane through `plane_point` whose
    /// outward normal is `plane_normal`, keeping the side the normal points away from.
    ///
    /// Vertices with signed distance ≤ 0 are kept, vertices beyond the line
    /// are dropped, and every edge that crosses the line contributes the exact
    /// crossing point. The result may be empty when the whole polygon lies
    /// outside; callers treat that as "cell eliminated".
    pub fn clip(&self, plane_point: &Point2<Real>, plane_normal: &Vector2<Real>) -> CellPolygon {
        let n = self.points.len();
        let mut out = Vec::with_capacity(n + 1);
        if n == 0 {
            return CellPolygon::new(out);
        }

        let distance = |p: &Point2<Real>| (p - plane_point).dot(plane_normal);
        for i in 0..n {
            let current = self.points[i];
            let next = self.points[(i + 1) % n];
            let dc = distance(&current);
            let dn = distance(&next);

            if dc <= 0.0 {
                out.push(current);
            }
            // strict crossing in either direction; touching endpoints were kept above
            if (dc < 0.0 && dn > 0.0) || (dc > 0.0 && dn < 0.0) {
                let t = dc / (dc - dn);
                out.push(current + (next - current) * t);
            }
        }

        CellPolygon::new(out)
    }

    /// Shoelace area, positive for counter-clockwise rings.
    pub fn signed_area(&self) -> Real {
        self.to_geo().signed_area()
    }

    /// Absolute shoelace area.
    pub fn area(&self) -> Real {
        self.signed_area().abs()
    }

    /// Reverses the ring if it winds clockwise.
    pub fn make_ccw(&mut self) {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
    }

    /// Convert into a `geo` polygon (closed exterior ring, no holes).
    pub fn to_geo(&self) -> GeoPolygon<Real> {
        let coords: Vec<Coord<Real>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        GeoPolygon::new(LineString::new(coords), vec![])
    }
}
