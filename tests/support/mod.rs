//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use shatter::{
    float_types::Real,
    mesh::{Channel, FragmentMesh},
};
use std::collections::HashSet;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Deterministic random source for reproducible fractures.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Axis-aligned unit cube centred at the origin.
pub fn unit_cube() -> FragmentMesh {
    FragmentMesh::cuboid(1.0, 1.0, 1.0)
}

/// Summed volume of a fragment list.
pub fn total_volume(fragments: &[FragmentMesh]) -> Real {
    fragments.iter().map(FragmentMesh::volume).sum()
}

/// Number of distinct vertices referenced by one channel.
pub fn referenced_vertices(mesh: &FragmentMesh, channel: Channel) -> usize {
    mesh.triangles(channel)
        .iter()
        .flatten()
        .collect::<HashSet<_>>()
        .len()
}

/// Every triangle of the mesh, as positions.
pub fn triangle_positions(mesh: &FragmentMesh, channel: Channel) -> Vec<[nalgebra::Point3<Real>; 3]> {
    mesh.triangles(channel)
        .iter()
        .map(|t| t.map(|i| mesh.vertices()[i as usize].pos))
        .collect()
}

/// `true` if every edge of the mesh (by position) is used exactly once in each
/// direction, i.e. the surface is closed and consistently wound.
///
/// Cut loops may leave T-junctions where cap corners are merged, so this check
/// is only meaningful for meshes without caps.
pub fn is_closed_by_position(mesh: &FragmentMesh) -> bool {
    use std::collections::HashMap;
    let key = |p: &nalgebra::Point3<Real>| {
        (
            (p.x * 1e6).round() as i64,
            (p.y * 1e6).round() as i64,
            (p.z * 1e6).round() as i64,
        )
    };
    let mut edges: HashMap<((i64, i64, i64), (i64, i64, i64)), i32> = HashMap::new();
    for channel in [Channel::Exterior, Channel::Interior] {
        for tri in triangle_positions(mesh, channel) {
            for i in 0..3 {
                let a = key(&tri[i]);
                let b = key(&tri[(i + 1) % 3]);
                *edges.entry((a, b)).or_insert(0) += 1;
            }
        }
    }
    edges
        .iter()
        .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
}
