//! Recursive plane slicing: repeatedly cut the most relevant piece until enough exist.

use crate::float_types::{EPSILON, Real, TAU};
use crate::mesh::FragmentMesh;
use crate::mesh::plane::Plane;
use log::debug;
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// The loop gives up after `SAFETY_FACTOR * target_count` cut attempts.
pub const SAFETY_FACTOR: usize = 2;

/// Cut-plane point jitter, as a fraction of the piece's bounding diagonal at full chaos.
pub const JITTER_SCALE: Real = 0.1;

/// Cuts `source` into (up to) `target_count` convex pieces.
///
/// Every round picks the queued piece with the highest
/// `volume / max(distance to impact, ε)`, so large pieces close to the impact
/// are cut first. The cut plane passes through a point between the piece's
/// bounding-box center and `local_impact` (weighted by `impact_bias`), jittered
/// by up to `plane_chaos * JITTER_SCALE` of the piece's diagonal, with a
/// uniformly random normal. A piece the plane does not cut is final.
///
/// The loop stops once `target_count` pieces exist, nothing is left to cut, or
/// the attempt budget is spent. With `target_count <= 1` the source comes back
/// untouched.
pub fn fragment<R: Rng + ?Sized>(
    rng: &mut R,
    source: &FragmentMesh,
    target_count: usize,
    local_impact: &Point3<Real>,
    impact_bias: Real,
    plane_chaos: Real,
) -> Vec<FragmentMesh> {
    let mut queue = vec![source.clone()];
    let mut finished: Vec<FragmentMesh> = Vec::new();
    let budget = target_count.saturating_mul(SAFETY_FACTOR);
    let mut attempts = 0;

    while !queue.is_empty() && queue.len() + finished.len() < target_count && attempts < budget {
        attempts += 1;
        let index = select_piece(&queue, local_impact);
        let piece = queue.swap_remove(index);

        let halves = cut_plane(rng, &piece, local_impact, impact_bias, plane_chaos)
            .and_then(|plane| piece.split(&plane));
        match halves {
            Some((positive, negative)) => {
                queue.push(positive);
                queue.push(negative);
            },
            None => {
                debug!("recursive: plane missed piece of volume {}, kept whole", piece.volume());
                finished.push(piece);
            },
        }
    }

    debug!(
        "recursive: {} pieces after {attempts} attempts ({} final, {} queued)",
        queue.len() + finished.len(),
        finished.len(),
        queue.len()
    );
    finished.append(&mut queue);
    finished
}

/// Index of the piece maximizing `volume / max(distance to impact, ε)`.
fn select_piece(queue: &[FragmentMesh], local_impact: &Point3<Real>) -> usize {
    queue
        .iter()
        .map(|piece| {
            let distance = (piece.center() - local_impact).norm().max(EPSILON);
            piece.volume() / distance
        })
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Random cut plane biased toward the impact point.
pub fn cut_plane<R: Rng + ?Sized>(
    rng: &mut R,
    piece: &FragmentMesh,
    local_impact: &Point3<Real>,
    impact_bias: Real,
    plane_chaos: Real,
) -> Option<Plane> {
    let center = piece.center();
    let anchor = center + (local_impact - center) * impact_bias.clamp(0.0, 1.0);
    let jitter = Vector3::<Real>::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    ) * (piece.diagonal() * JITTER_SCALE * plane_chaos.clamp(0.0, 1.0));

    Plane::from_point_normal(&(anchor + jitter), random_unit_vector(rng))
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector3<Real> {
    let z: Real = rng.gen_range(-1.0..=1.0);
    let phi: Real = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}
