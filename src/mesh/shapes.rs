//! Primitive source bodies.

use crate::float_types::Real;
use crate::mesh::FragmentMesh;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point2, Point3, Vector3};

impl FragmentMesh {
    /// Create an axis-aligned box centred at the origin.
    ///
    /// Every face gets its own four vertices (flat normals, 0..1 UVs) and all
    /// twelve triangles go to the exterior channel, so the box is ready to be
    /// fractured as an intact body.
    ///
    /// # Example
    /// ```
    /// # use shatter::mesh::{Channel, FragmentMesh};
    /// let slab = FragmentMesh::cuboid(2.0, 2.0, 0.2);
    /// assert_eq!(slab.triangle_count(Channel::Exterior), 12);
    /// assert!((slab.volume() - 0.8).abs() < 1e-9);
    /// ```
    pub fn cuboid(width: Real, height: Real, depth: Real) -> FragmentMesh {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [(Vector3<Real>, [[Real; 3]; 4]); 6] = [
            (
                Vector3::x(),
                [[hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz], [hx, -hy, hz]],
            ),
            (
                -Vector3::x(),
                [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]],
            ),
            (
                Vector3::y(),
                [[-hx, hy, -hz], [-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz]],
            ),
            (
                -Vector3::y(),
                [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]],
            ),
            (
                Vector3::z(),
                [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]],
            ),
            (
                -Vector3::z(),
                [[-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz], [hx, -hy, -hz]],
            ),
        ];
        let uvs = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut exterior = Vec::with_capacity(12);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(uvs) {
                vertices.push(Vertex::new(
                    Point3::new(corner[0], corner[1], corner[2]),
                    normal,
                    uv,
                ));
            }
            exterior.push([base, base + 1, base + 2]);
            exterior.push([base, base + 2, base + 3]);
        }

        FragmentMesh::from_parts(vertices, exterior, Vec::new())
    }
}
