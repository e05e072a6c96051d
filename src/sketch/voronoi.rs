//! Voronoi partition of a rectangular face by all-pairs bisector clipping.

use crate::float_types::{EPSILON, Real};
use crate::sketch::CellPolygon;
use geo::Rect;
use log::debug;
use nalgebra::Point2;
use rand::Rng;

/// Draws `count` sites uniformly inside `bounds`, each pulled toward `bias_point`
/// by a factor drawn uniformly from `[0, impact_bias]`.
///
/// `impact_bias = 0` leaves the sites uniform; `impact_bias = 1` lets a site
/// land anywhere on the segment up to the bias point, which concentrates small
/// cells around it.
pub fn sample_sites<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    bias_point: &Point2<Real>,
    bounds: &Rect<Real>,
    impact_bias: Real,
) -> Vec<Point2<Real>> {
    let (min, max) = (bounds.min(), bounds.max());
    let impact_bias = impact_bias.clamp(0.0, 1.0);
    (0..count)
        .map(|_| {
            let site = Point2::new(
                lerp(min.x, max.x, rng.gen_range(0.0..=1.0)),
                lerp(min.y, max.y, rng.gen_range(0.0..=1.0)),
            );
            let pull = impact_bias * rng.gen_range(0.0..=1.0);
            site + (bias_point - site) * pull
        })
        .collect()
}

/// Builds the Voronoi cell of every site, restricted to `bounds`.
///
/// Each cell starts as the full rectangle and is clipped by the perpendicular
/// bisector toward every other site. Cells clipped below three corners are
/// dropped. Sites that coincide with an earlier site contribute no cell.
pub fn build_cells(sites: &[Point2<Real>], bounds: &Rect<Real>) -> Vec<CellPolygon> {
    let face = CellPolygon::rectangle(bounds);
    let mut cells = Vec::with_capacity(sites.len());

    for (i, site) in sites.iter().enumerate() {
        if sites[..i].iter().any(|other| (other - site).norm() <= EPSILON) {
            debug!("voronoi: site {i} coincides with an earlier site, skipped");
            continue;
        }

        let mut cell = face.clone();
        for (j, other) in sites.iter().enumerate() {
            if i == j || (other - site).norm() <= EPSILON {
                continue;
            }
            let midpoint = Point2::from((site.coords + other.coords) * 0.5);
            cell = cell.clip(&midpoint, &(other - site));
            if cell.len() < 3 {
                break;
            }
        }

        if cell.len() >= 3 {
            cells.push(cell);
        } else {
            debug!("voronoi: cell of site {i} clipped away");
        }
    }

    cells
}

/// Samples sites with [`sample_sites`] and partitions `bounds` with [`build_cells`].
pub fn build<R: Rng + ?Sized>(
    rng: &mut R,
    site_count: usize,
    bias_point: &Point2<Real>,
    bounds: &Rect<Real>,
    impact_bias: Real,
) -> Vec<CellPolygon> {
    let sites = sample_sites(rng, site_count, bias_point, bounds, impact_bias);
    build_cells(&sites, bounds)
}

#[inline]
fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}
