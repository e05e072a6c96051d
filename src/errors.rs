//! Fracture errors

use crate::float_types::{Real, parry3d::shape::TriMeshBuilderError};

/// Everything that can make the crate refuse an operation.
///
/// Geometric degeneracy (a plane that misses a piece, a Voronoi cell clipped
/// away) is never reported here; those cases shrink the fragment list instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FractureError {
    /// The source mesh has no vertices or no triangles
    #[error("(EmptyMesh) The source mesh has no vertices or no triangles")]
    EmptyMesh,
    /// A triangle refers to a vertex that does not exist
    #[error("(IndexOutOfRange) Triangle index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: u32, len: usize },
    /// A configuration value is outside its accepted range
    #[error("(InvalidConfig) {0}")]
    InvalidConfig(String),
    /// The impact point has a NaN or infinite coordinate
    #[error("(NonFiniteImpact) Impact point ({x}, {y}, {z}) is not finite")]
    NonFiniteImpact { x: Real, y: Real, z: Real },
    /// The Voronoi strategy needs a face with a measurable area
    #[error("(DegenerateFace) The body has no face with a measurable area to partition")]
    DegenerateFace,
    /// Parry refused the triangle soup handed over for collision
    #[error(transparent)]
    TriMesh(#[from] TriMeshBuilderError),
}
