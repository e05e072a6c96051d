//! Struct and functions for working with the `Vertex`s fragment meshes are built from.

use crate::float_types::Real;
use nalgebra::{Isometry3, Point2, Point3, Vector3};

/// A mesh vertex, holding position, normal and texture coordinate.
///
/// Vertices are never shared across a cut seam: both sides get their own copy
/// so each can carry the normal of its own surface.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    pub uv: Point2<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in the body's local frame
    /// * `normal` – (optionally non‑unit) normal; it will be **copied verbatim**
    /// * `uv`     – texture coordinate
    ///
    /// Non-finite components are replaced by zero so a single bad input cannot
    /// poison bounds or volume sums downstream.
    #[inline]
    pub fn new(mut pos: Point3<Real>, mut normal: Vector3<Real>, mut uv: Point2<Real>) -> Self {
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }
        for c in normal.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }
        for c in uv.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        Vertex { pos, normal, uv }
    }

    /// Return the linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Position, normal and texture coordinate all use the same parameter, so a
    /// seam vertex lands exactly where the edge crosses the cutting plane.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        // p(t) = p0 + t * (p1 - p0)
        let pos = self.pos + (other.pos - self.pos) * t;
        // n(t) = n0 + t * (n1 - n0)
        let normal = self.normal + (other.normal - self.normal) * t;
        let uv = self.uv + (other.uv - self.uv) * t;
        Vertex::new(pos, normal, uv)
    }

    /// Returns this vertex moved by a rigid transform (normal rotated, uv kept).
    pub fn transformed(&self, iso: &Isometry3<Real>) -> Vertex {
        Vertex {
            pos: iso * self.pos,
            normal: iso.rotation * self.normal,
            uv: self.uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_uses_one_parameter_for_every_attribute() {
        let a = Vertex::new(Point3::origin(), Vector3::x(), Point2::new(0.0, 0.0));
        let b = Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::y(), Point2::new(1.0, 1.0));
        let mid = a.interpolate(&b, 0.25);
        assert_eq!(mid.pos, Point3::new(0.5, 0.0, 0.0));
        assert_eq!(mid.normal, Vector3::new(0.75, 0.25, 0.0));
        assert_eq!(mid.uv, Point2::new(0.25, 0.25));
    }

    #[test]
    fn non_finite_components_are_zeroed() {
        let v = Vertex::new(
            Point3::new(Real::NAN, 1.0, 2.0),
            Vector3::new(0.0, Real::INFINITY, 1.0),
            Point2::new(0.5, Real::NEG_INFINITY),
        );
        assert_eq!(v.pos, Point3::new(0.0, 1.0, 2.0));
        assert_eq!(v.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(v.uv, Point2::new(0.5, 0.0));
    }
}
