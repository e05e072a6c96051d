//! Cutting planes in Hessian normal form.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};

/// A plane `n·p = w` with a unit normal.
///
/// The positive side is the half-space the normal points into; points exactly
/// on the plane are classified as positive so every vertex has one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a normal vector and offset.
    /// Returns `None` when `normal` is too short to define a direction.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Option<Self> {
        let length = normal.norm();
        if !length.is_finite() || length < EPSILON {
            return None;
        }
        Some(Plane {
            normal: normal / length,
            w: w / length,
        })
    }

    /// Create the plane through `point` with the given (not necessarily unit) normal.
    pub fn from_point_normal(point: &Point3<Real>, normal: Vector3<Real>) -> Option<Self> {
        let length = normal.norm();
        if !length.is_finite() || length < EPSILON {
            return None;
        }
        let normal = normal / length;
        Some(Plane {
            normal,
            w: normal.dot(&point.coords),
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance of `point` from the plane, positive on the normal's side.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// `true` when `point` belongs to the positive side (distance ≥ 0).
    #[inline]
    pub fn is_positive(&self, point: &Point3<Real>) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// An orthonormal basis `(u, v)` of the plane with `u × v = normal`.
    ///
    /// The seed axis is the world axis least aligned with the normal; if the
    /// cross product still collapses, a second axis is used.
    pub fn tangents(&self) -> (Vector3<Real>, Vector3<Real>) {
        let n = self.normal;
        let seed = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let mut u = seed.cross(&n);
        if u.norm_squared() < EPSILON {
            u = Vector3::z().cross(&n);
        }
        let u = u.normalize();
        let v = n.cross(&u);
        (u, v)
    }
}
