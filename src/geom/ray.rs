//!
//! Rays restricted to a parametric interval.
//!

use std::f64::INFINITY;

use cgmath::Vector3;
use cgmath::prelude::*;

/// Offset applied to the start of rays shot from a caller supplied origin,
/// so the origin does not intersect the surface it lies on.
pub const DEFAULT_RAY_TNEAR: f64 = 1e-4;

/// A ray `origin + t * direction` that is only valid for `t` in `[tmin, tmax)`.
///
/// The direction is not normalized, distances are expressed in multiples
/// of its length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub tmin: f64,
    pub tmax: f64
}

impl Ray {
    /// Creates an unbounded ray starting at `tmin`.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>, tmin: f64) -> Ray {
        Ray {
            origin,
            direction,
            tmin,
            tmax: INFINITY
        }
    }

    /// Creates the ray covering the segment from `a` to `a + ab`, i.e. `[0, 1)`.
    pub fn segment(a: Vector3<f32>, ab: Vector3<f32>) -> Ray {
        Ray {
            origin: a,
            direction: ab,
            tmin: 0.0,
            tmax: 1.0
        }
    }

    /// Returns a copy of this ray that starts at `tmin` instead.
    pub fn starting_at(&self, tmin: f64) -> Ray {
        Ray { tmin, ..*self }
    }

    pub fn at(&self, t: f64) -> Vector3<f32> {
        self.origin + self.direction * (t as f32)
    }

    /// The interval at the precision the triangle tests run at.
    ///
    /// Both ends are narrowed the same way everywhere, so a hit accepted by
    /// the acceleration structure also passes the interval check of the query.
    pub fn interval_f32(&self) -> (f32, f32) {
        (self.tmin as f32, self.tmax as f32)
    }

    /// A ray that cannot hit anything, because its direction is zero or
    /// it contains NaN or infinite components, or its interval is empty.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.origin.x.is_finite() && self.origin.y.is_finite() && self.origin.z.is_finite() &&
            self.direction.x.is_finite() && self.direction.y.is_finite() && self.direction.z.is_finite();

        !finite || self.direction.magnitude2() == 0.0 || !(self.tmin < self.tmax)
    }
}
