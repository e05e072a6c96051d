//! Voronoi fracture of a slab: partition its broad face, extrude every cell through it.

use crate::errors::FractureError;
use crate::float_types::{EPSILON, Real};
use crate::mesh::FragmentMesh;
use crate::sketch::voronoi;
use geo::{Rect, coord};
use log::debug;
use nalgebra::{Isometry3, Matrix3, Point2, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use rand::Rng;

/// The face a slab is partitioned on: the two broad axes of its bounding box
/// and the thin axis the cells are extruded along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceAxes {
    pub u: usize,
    pub v: usize,
    pub thickness: usize,
}

impl FaceAxes {
    /// Picks the thinnest bounding-box axis as thickness; `u` and `v` follow it
    /// cyclically so that (u, v, thickness) stays right-handed.
    pub fn of(mesh: &FragmentMesh) -> Self {
        let extents = mesh.half_extents();
        let thickness = (0..3)
            .min_by(|&a, &b| extents[a].total_cmp(&extents[b]))
            .unwrap_or(2);
        FaceAxes {
            u: (thickness + 1) % 3,
            v: (thickness + 2) % 3,
            thickness,
        }
    }

    /// Rigid transform taking face coordinates (u, v, thickness) back to the mesh frame.
    pub fn to_local(&self) -> Isometry3<Real> {
        let basis = Matrix3::from_columns(&[
            axis(self.u),
            axis(self.v),
            axis(self.thickness),
        ]);
        let rotation = Rotation3::from_matrix_unchecked(basis);
        Isometry3::from_parts(Translation3::identity(), UnitQuaternion::from_rotation_matrix(&rotation))
    }

    /// Projects a mesh-frame point onto the face.
    pub fn project(&self, point: &Point3<Real>) -> Point2<Real> {
        Point2::new(point[self.u], point[self.v])
    }
}

fn axis(index: usize) -> Vector3<Real> {
    let mut axis = Vector3::zeros();
    axis[index] = 1.0;
    axis
}

/// Breaks `source` into the extruded Voronoi cells of `target_count` sites
/// sampled on its broad face, denser around the projection of `local_impact`.
///
/// The cells tile the face rectangle of the bounding box and run through its
/// full thickness, so the result is exact for box-shaped slabs. Cells too
/// small to extrude are skipped.
///
/// ## Errors
/// [`FractureError::DegenerateFace`] if the broad face has no area.
pub fn fragment<R: Rng + ?Sized>(
    rng: &mut R,
    source: &FragmentMesh,
    target_count: usize,
    local_impact: &Point3<Real>,
    impact_bias: Real,
) -> Result<Vec<FragmentMesh>, FractureError> {
    let axes = FaceAxes::of(source);
    let aabb = source.bounding_box();
    let face = Rect::new(
        coord! { x: aabb.mins[axes.u], y: aabb.mins[axes.v] },
        coord! { x: aabb.maxs[axes.u], y: aabb.maxs[axes.v] },
    );
    if face.width() * face.height() <= EPSILON {
        return Err(FractureError::DegenerateFace);
    }

    let impact = axes.project(local_impact);
    let bias_point = Point2::new(
        impact.x.clamp(face.min().x, face.max().x),
        impact.y.clamp(face.min().y, face.max().y),
    );

    let cells = voronoi::build(rng, target_count.max(1), &bias_point, &face, impact_bias);
    let to_local = axes.to_local();
    let (z_min, z_max) = (aabb.mins[axes.thickness], aabb.maxs[axes.thickness]);

    let fragments: Vec<FragmentMesh> = cells
        .iter()
        .filter(|cell| !cell.is_degenerate())
        .map(|cell| cell.extrude(z_min, z_max).transform(&to_local))
        .collect();

    debug!(
        "voronoi: {} cells -> {} fragments (thickness axis {})",
        cells.len(),
        fragments.len(),
        axes.thickness
    );
    Ok(fragments)
}
