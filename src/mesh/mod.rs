//! `FragmentMesh` struct: an indexed triangle mesh with an exterior and an interior channel.

use crate::errors::FractureError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::Aabb,
    rapier3d::prelude::{SharedShape, TriMesh},
};
use nalgebra::{Isometry3, Point3, Vector3, partial_max, partial_min};

pub mod plane;
pub mod shapes;
pub mod split;
pub mod vertex;

use vertex::Vertex;

/// The two surface roles a triangle can play.
///
/// Membership is decided when a triangle is created and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The visible surface inherited from the source body
    Exterior,
    /// Faces exposed by breaking the body
    Interior,
}

/// A closed triangle mesh produced (or consumed) by a fracture operation.
///
/// Bounds and volume are derived from the geometry when the mesh is built and
/// are never touched afterwards; there is no way to edit a `FragmentMesh` in
/// place, only to build a new one.
#[derive(Clone, Debug)]
pub struct FragmentMesh {
    vertices: Vec<Vertex>,
    exterior: Vec<[u32; 3]>,
    interior: Vec<[u32; 3]>,
    bounding_box: Aabb,
    volume: Real,
}

impl FragmentMesh {
    /// Build a mesh from a vertex list and one triangle list per channel.
    ///
    /// ## Errors
    /// [`FractureError::IndexOutOfRange`] if a triangle refers to a missing vertex.
    pub fn from_channels(
        vertices: Vec<Vertex>,
        exterior: Vec<[u32; 3]>,
        interior: Vec<[u32; 3]>,
    ) -> Result<Self, FractureError> {
        let len = vertices.len();
        if let Some(&index) = exterior
            .iter()
            .chain(interior.iter())
            .flatten()
            .find(|&&i| i as usize >= len)
        {
            return Err(FractureError::IndexOutOfRange { index, len });
        }
        Ok(Self::from_parts(vertices, exterior, interior))
    }

    /// Internal constructor for builders that produce valid indices by construction.
    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        exterior: Vec<[u32; 3]>,
        interior: Vec<[u32; 3]>,
    ) -> Self {
        let mut mesh = FragmentMesh {
            vertices,
            exterior,
            interior,
            bounding_box: Aabb::new(Point3::origin(), Point3::origin()),
            volume: 0.0,
        };
        mesh.recompute_derived();
        mesh
    }

    /// Recomputes the bounding box and the volume estimate.
    fn recompute_derived(&mut self) {
        let mut min_x = Real::MAX;
        let mut min_y = Real::MAX;
        let mut min_z = Real::MAX;
        let mut max_x = -Real::MAX;
        let mut max_y = -Real::MAX;
        let mut max_z = -Real::MAX;

        for v in &self.vertices {
            min_x = *partial_min(&min_x, &v.pos.x).unwrap_or(&min_x);
            min_y = *partial_min(&min_y, &v.pos.y).unwrap_or(&min_y);
            min_z = *partial_min(&min_z, &v.pos.z).unwrap_or(&min_z);

            max_x = *partial_max(&max_x, &v.pos.x).unwrap_or(&max_x);
            max_y = *partial_max(&max_y, &v.pos.y).unwrap_or(&max_y);
            max_z = *partial_max(&max_z, &v.pos.z).unwrap_or(&max_z);
        }

        // No vertices: a trivial AABB at origin
        self.bounding_box = if min_x > max_x {
            Aabb::new(Point3::origin(), Point3::origin())
        } else {
            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        };

        // Divergence theorem: sum of signed tetrahedra against the box center.
        // Measuring from the center keeps the terms small for meshes far from the origin.
        let center = self.bounding_box.center();
        let signed: Real = self
            .exterior
            .iter()
            .chain(self.interior.iter())
            .map(|&[a, b, c]| {
                let pa = self.vertices[a as usize].pos - center;
                let pb = self.vertices[b as usize].pos - center;
                let pc = self.vertices[c as usize].pos - center;
                pa.dot(&pb.cross(&pc))
            })
            .sum();
        self.volume = (signed / 6.0).abs();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangles of one channel, as indices into [`Self::vertices`].
    pub fn triangles(&self, channel: Channel) -> &[[u32; 3]] {
        match channel {
            Channel::Exterior => &self.exterior,
            Channel::Interior => &self.interior,
        }
    }

    pub fn triangle_count(&self, channel: Channel) -> usize {
        self.triangles(channel).len()
    }

    /// Iterates over every triangle of both channels, tagged with its channel.
    pub fn all_triangles(&self) -> impl Iterator<Item = (Channel, [u32; 3])> + '_ {
        self.exterior
            .iter()
            .map(|&t| (Channel::Exterior, t))
            .chain(self.interior.iter().map(|&t| (Channel::Interior, t)))
    }

    /// A mesh is empty when it has nothing to render or simulate.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || (self.exterior.is_empty() && self.interior.is_empty())
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] spanning all vertices.
    pub const fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    /// Length of the bounding box diagonal.
    pub fn diagonal(&self) -> Real {
        (self.bounding_box.maxs - self.bounding_box.mins).norm()
    }

    /// Enclosed volume of the (closed) mesh.
    pub const fn volume(&self) -> Real {
        self.volume
    }

    /// Returns a copy moved by a rigid transform.
    pub fn transform(&self, iso: &Isometry3<Real>) -> FragmentMesh {
        let vertices = self.vertices.iter().map(|v| v.transformed(iso)).collect();
        FragmentMesh::from_parts(vertices, self.exterior.clone(), self.interior.clone())
    }

    /// Extracts positions and the triangle list of both channels (exterior first).
    pub fn positions_and_indices(&self) -> (Vec<Point3<Real>>, Vec<[u32; 3]>) {
        let positions = self.vertices.iter().map(|v| v.pos).collect();
        let indices = self
            .exterior
            .iter()
            .chain(self.interior.iter())
            .copied()
            .collect();
        (positions, indices)
    }

    /// Convert this mesh to a Parry `TriMesh`.\
    /// Useful for collision detection.
    ///
    /// ## Errors
    /// If Parry returns a `TriMeshBuilderError`
    pub fn to_trimesh(&self) -> Result<TriMesh, FractureError> {
        let (vertices, indices) = self.positions_and_indices();
        Ok(TriMesh::new(vertices, indices)?)
    }

    /// Convex-hull collision shape for this fragment, wrapped in a `SharedShape`
    /// to be used in Rapier. Fragments are convex, so the hull is the fragment.
    ///
    /// Returns `None` if the hull is degenerate (flat or empty mesh).
    pub fn to_rapier_shape(&self) -> Option<SharedShape> {
        let points: Vec<Point3<Real>> = self.vertices.iter().map(|v| v.pos).collect();
        SharedShape::convex_hull(&points)
    }

    /// Centroid of the bounding box.
    pub fn center(&self) -> Point3<Real> {
        self.bounding_box.center()
    }

    /// Half extents of the bounding box.
    pub fn half_extents(&self) -> Vector3<Real> {
        self.bounding_box.half_extents()
    }
}
