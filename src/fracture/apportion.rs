//! Distributing a body's mass over its fragments by volume.

use crate::float_types::{EPSILON, Real};
use crate::mesh::FragmentMesh;

/// Default lower bound for a single fragment's mass.
pub const DEFAULT_MIN_MASS: Real = 0.01;

/// Gives every fragment `total_mass * volume / Σ volumes`, never less than `min_mass`.
///
/// When the summed volume is numerically zero the sum is taken as 1, so a
/// degenerate fracture still yields finite, floored masses. The floor means
/// the masses only add up to `total_mass` when no fragment hits it.
pub fn apportion(fragments: &[FragmentMesh], total_mass: Real, min_mass: Real) -> Vec<Real> {
    let volumes: Vec<Real> = fragments.iter().map(FragmentMesh::volume).collect();
    apportion_volumes(&volumes, total_mass, min_mass)
}

/// [`apportion`] over bare volume estimates.
pub fn apportion_volumes(volumes: &[Real], total_mass: Real, min_mass: Real) -> Vec<Real> {
    let sum: Real = volumes.iter().sum();
    let sum = if sum.abs() <= EPSILON { 1.0 } else { sum };
    volumes
        .iter()
        .map(|v| (total_mass * v / sum).max(min_mass))
        .collect()
}
