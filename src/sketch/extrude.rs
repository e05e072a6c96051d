//! Extruding a convex cell into a capped prism.

use crate::float_types::Real;
use crate::mesh::FragmentMesh;
use crate::mesh::vertex::Vertex;
use crate::sketch::CellPolygon;
use nalgebra::{Point2, Point3, Vector3};

impl CellPolygon {
    /// Extrudes this convex cell along +Z from `z_min` to `z_max`.
    ///
    /// The front (`z_max`) and back (`z_min`) faces are fan-triangulated from
    /// the first corner with opposite windings so both face outward, and land in
    /// the exterior channel. Each edge becomes a side quad of two triangles in
    /// the interior channel, with its own vertices carrying the outward face
    /// normal `(b - a) × (top - a)`.
    ///
    /// Callers must skip degenerate cells (see [`CellPolygon::is_degenerate`]).
    pub fn extrude(&self, z_min: Real, z_max: Real) -> FragmentMesh {
        let (z_min, z_max) = if z_min <= z_max { (z_min, z_max) } else { (z_max, z_min) };
        let mut ring = self.clone();
        ring.make_ccw();
        let points = &ring.points;
        let n = points.len();

        let mut vertices = Vec::with_capacity(n * 6);
        let mut exterior = Vec::with_capacity(2 * n.saturating_sub(2));
        let mut interior = Vec::with_capacity(2 * n);

        // front and back caps
        let front = vertices.len() as u32;
        for p in points {
            vertices.push(Vertex::new(Point3::new(p.x, p.y, z_max), Vector3::z(), *p));
        }
        let back = vertices.len() as u32;
        for p in points {
            vertices.push(Vertex::new(Point3::new(p.x, p.y, z_min), -Vector3::z(), *p));
        }
        for i in 1..n.saturating_sub(1) as u32 {
            exterior.push([front, front + i, front + i + 1]);
            exterior.push([back, back + i + 1, back + i]);
        }

        // side walls, one flat-shaded quad per edge
        let thickness = z_max - z_min;
        let mut run = 0.0;
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            let a_bottom = Point3::new(a.x, a.y, z_min);
            let b_bottom = Point3::new(b.x, b.y, z_min);
            let b_top = Point3::new(b.x, b.y, z_max);
            let a_top = Point3::new(a.x, a.y, z_max);

            let normal = (b_bottom - a_bottom).cross(&(b_top - a_bottom));
            let normal = normal.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros);

            let length = (b - a).norm();
            let base = vertices.len() as u32;
            vertices.push(Vertex::new(a_bottom, normal, Point2::new(run, 0.0)));
            vertices.push(Vertex::new(b_bottom, normal, Point2::new(run + length, 0.0)));
            vertices.push(Vertex::new(b_top, normal, Point2::new(run + length, thickness)));
            vertices.push(Vertex::new(a_top, normal, Point2::new(run, thickness)));
            run += length;

            interior.push([base, base + 1, base + 2]);
            interior.push([base, base + 2, base + 3]);
        }

        FragmentMesh::from_parts(vertices, exterior, interior)
    }
}
