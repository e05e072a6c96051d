//! Splitting a closed `FragmentMesh` in two along a plane, capping both openings.

use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use crate::mesh::{Channel, FragmentMesh};
use log::debug;
use nalgebra::{Point2, Point3, Vector3};
use std::collections::HashMap;

/// One half of a split under construction.
#[derive(Default)]
struct SideBuilder {
    vertices: Vec<Vertex>,
    exterior: Vec<[u32; 3]>,
    interior: Vec<[u32; 3]>,
}

impl SideBuilder {
    fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    fn push_triangle(&mut self, channel: Channel, triangle: [u32; 3]) {
        match channel {
            Channel::Exterior => self.exterior.push(triangle),
            Channel::Interior => self.interior.push(triangle),
        }
    }

    fn build(self) -> FragmentMesh {
        FragmentMesh::from_parts(self.vertices, self.exterior, self.interior)
    }
}

/// Where a vertex of the source mesh went: its side and its index there.
#[derive(Clone, Copy)]
struct Placed {
    positive: bool,
    index: u32,
}

impl FragmentMesh {
    /// Splits this mesh by `plane` into `(positive, negative)` halves.
    ///
    /// Vertices with a signed distance ≥ 0 go to the positive half. Triangles
    /// crossing the plane are cut along the crossing, and each half's new
    /// opening is closed by a cap in the [`Channel::Interior`] channel whose
    /// normal faces away from the half it closes.
    ///
    /// Returns `None` when the plane does not cut the mesh into two pieces that
    /// both enclose a measurable volume; the caller keeps the mesh whole.
    ///
    /// The cross-section is assumed convex: cap triangulation walks the cut
    /// loop in angular order around its centroid.
    pub fn split(&self, plane: &Plane) -> Option<(FragmentMesh, FragmentMesh)> {
        // 1) cheap reject: the whole bounding box lies strictly on one side
        let corners = self.bounding_box().vertices();
        if corners.iter().all(|c| plane.signed_distance(c) > 0.0)
            || corners.iter().all(|c| plane.signed_distance(c) < 0.0)
        {
            return None;
        }

        // 2) classify and copy every vertex into its side
        let mut positive = SideBuilder::default();
        let mut negative = SideBuilder::default();
        let distances: Vec<Real> = self
            .vertices()
            .iter()
            .map(|v| plane.signed_distance(&v.pos))
            .collect();
        let placed: Vec<Placed> = self
            .vertices()
            .iter()
            .zip(&distances)
            .map(|(v, &d)| {
                if d >= 0.0 {
                    Placed { positive: true, index: positive.push_vertex(*v) }
                } else {
                    Placed { positive: false, index: negative.push_vertex(*v) }
                }
            })
            .collect();

        if placed.iter().all(|p| p.positive) || placed.iter().all(|p| !p.positive) {
            return None;
        }

        // 3) reclassify triangles, cutting the ones that span the plane
        let mut edge_cache: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
        let mut cut_points: Vec<Point3<Real>> = Vec::new();

        for (channel, triangle) in self.all_triangles() {
            let sides = triangle.map(|i| placed[i as usize].positive);
            let positives = sides.iter().filter(|&&s| s).count();

            if positives == 3 || positives == 0 {
                let target = if positives == 3 { &mut positive } else { &mut negative };
                target.push_triangle(channel, triangle.map(|i| placed[i as usize].index));
                continue;
            }

            // The isolated vertex is the one whose side differs from the other two.
            let isolated_positive = positives == 1;
            let k = sides
                .iter()
                .position(|&s| s == isolated_positive)
                .unwrap_or(0);
            let v0 = triangle[k];
            let v1 = triangle[(k + 1) % 3];
            let v2 = triangle[(k + 2) % 3];

            let i1 = self.cut_edge(v0, v1, &distances, &mut positive, &mut negative, &mut edge_cache);
            let i2 = self.cut_edge(v0, v2, &distances, &mut positive, &mut negative, &mut edge_cache);
            cut_points.push(positive.vertices[i1.0 as usize].pos);
            cut_points.push(positive.vertices[i2.0 as usize].pos);

            let (minority, majority) = if isolated_positive {
                (&mut positive, &mut negative)
            } else {
                (&mut negative, &mut positive)
            };
            let pick = |pair: (u32, u32)| if isolated_positive { pair } else { (pair.1, pair.0) };
            let (m1, j1) = pick(i1);
            let (m2, j2) = pick(i2);

            minority.push_triangle(channel, [placed[v0 as usize].index, m1, m2]);
            let p1 = placed[v1 as usize].index;
            let p2 = placed[v2 as usize].index;
            majority.push_triangle(channel, [j1, p1, p2]);
            majority.push_triangle(channel, [j1, p2, j2]);
        }

        // 4) close both openings
        let merge_distance = tolerance() * self.diagonal().max(1.0);
        let Some(ring) = cap_ring(&cut_points, plane, merge_distance) else {
            debug!("split: cut loop collapsed ({} points), keeping piece whole", cut_points.len());
            return None;
        };
        let (u, v) = plane.tangents();
        add_cap(&mut negative, &ring, plane.normal, u, v, false);
        add_cap(&mut positive, &ring, -plane.normal, u, v, true);

        // 5) derived bounds and volume are computed by the mesh constructor
        let positive = positive.build();
        let negative = negative.build();
        if positive.volume() <= EPSILON || negative.volume() <= EPSILON {
            debug!(
                "split: degenerate half (volumes {} / {}), keeping piece whole",
                positive.volume(),
                negative.volume()
            );
            return None;
        }

        debug!(
            "split: {} vertices -> {} / {} (cap of {} points)",
            self.vertices().len(),
            positive.vertices().len(),
            negative.vertices().len(),
            ring.len()
        );
        Some((positive, negative))
    }

    /// Returns the crossing vertex of edge `a`–`b` as `(positive index, negative index)`,
    /// creating it on both sides the first time the edge is seen.
    fn cut_edge(
        &self,
        a: u32,
        b: u32,
        distances: &[Real],
        positive: &mut SideBuilder,
        negative: &mut SideBuilder,
        edge_cache: &mut HashMap<(u32, u32), (u32, u32)>,
    ) -> (u32, u32) {
        // canonical direction so both triangles sharing the edge get the same point
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        *edge_cache.entry((a, b)).or_insert_with(|| {
            let da = distances[a as usize];
            let db = distances[b as usize];
            let t = da / (da - db);
            let vertex = self.vertices()[a as usize].interpolate(&self.vertices()[b as usize], t);
            (positive.push_vertex(vertex), negative.push_vertex(vertex))
        })
    }
}

/// Orders the cut loop angularly around its centroid, merging coincident points
/// and dropping points that sit on a straight run of the loop.
///
/// Returns `None` if fewer than three corners remain.
fn cap_ring(points: &[Point3<Real>], plane: &Plane, merge_distance: Real) -> Option<Vec<Point3<Real>>> {
    let mut unique: Vec<Point3<Real>> = Vec::with_capacity(points.len() / 2);
    for p in points {
        if !unique.iter().any(|q| (q - p).norm() <= merge_distance) {
            unique.push(*p);
        }
    }
    if unique.len() < 3 {
        return None;
    }

    let centroid = unique
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / unique.len() as Real;
    let (u, v) = plane.tangents();
    let mut angled: Vec<(Real, Point3<Real>)> = unique
        .into_iter()
        .map(|p| {
            let d = p.coords - centroid;
            (d.dot(&v).atan2(d.dot(&u)), p)
        })
        .collect();
    angled.sort_by(|a, b| a.0.total_cmp(&b.0));
    let sorted: Vec<Point3<Real>> = angled.into_iter().map(|(_, p)| p).collect();

    // Drop collinear points; area is measured in the plane so the threshold
    // scales with the square of the merge distance.
    let n = sorted.len();
    let area_eps = merge_distance * merge_distance;
    let ring: Vec<Point3<Real>> = (0..n)
        .filter(|&i| {
            let prev = sorted[(i + n - 1) % n];
            let next = sorted[(i + 1) % n];
            let turn = (sorted[i] - prev).cross(&(next - sorted[i]));
            turn.dot(&plane.normal).abs() > area_eps
        })
        .map(|i| sorted[i])
        .collect();

    (ring.len() >= 3).then_some(ring)
}

/// Fans the counter-clockwise `ring` into `side` with the given outward normal.
/// `reverse` flips the winding for the side whose outward normal opposes the plane normal.
fn add_cap(
    side: &mut SideBuilder,
    ring: &[Point3<Real>],
    normal: Vector3<Real>,
    u: Vector3<Real>,
    v: Vector3<Real>,
    reverse: bool,
) {
    let indices: Vec<u32> = ring
        .iter()
        .map(|p| {
            let uv = Point2::new(p.coords.dot(&u), p.coords.dot(&v));
            side.push_vertex(Vertex::new(*p, normal, uv))
        })
        .collect();

    for i in 1..indices.len() - 1 {
        let triangle = if reverse {
            [indices[0], indices[i + 1], indices[i]]
        } else {
            [indices[0], indices[i], indices[i + 1]]
        };
        side.push_triangle(Channel::Interior, triangle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_ring_removes_duplicates_and_straight_runs() {
        let plane = Plane::from_normal(Vector3::z(), 0.0).unwrap();
        let points = [
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
        ];
        let ring = cap_ring(&points, &plane, 1e-6).unwrap();
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn cap_ring_needs_three_corners() {
        let plane = Plane::from_normal(Vector3::z(), 0.0).unwrap();
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(cap_ring(&points, &plane, 1e-6).is_none());
    }
}
