use std::f32::{INFINITY, NEG_INFINITY};
use cgmath::Vector3;

use super::ray::Ray;

/// Bound on the relative rounding error of the slab distances, used to
/// widen the exit distance so boxes are never missed by rounding alone.
const SLAB_ERROR: f32 = 2.0 * (3.0 * 0.5 * ::std::f32::EPSILON) / (1.0 - 3.0 * 0.5 * ::std::f32::EPSILON);

/// An axis-aligned bounding box in 3D
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>
}

impl Aabb {
    /// An aabb with max at negative infinity and min at positive infinity,
    /// which is the neutral element for `include` and `union`.
    pub fn empty() -> Aabb {
        Aabb {
            min: Vector3::new(INFINITY, INFINITY, INFINITY),
            max: Vector3::new(NEG_INFINITY, NEG_INFINITY, NEG_INFINITY)
        }
    }

    /// Creates the smallest aabb that encloses all of the points returned
    /// by the given iterator.
    /// Returns an empty aabb if the given iterator was empty.
    pub fn from_points<P>(points: P) -> Aabb
        where P: IntoIterator<Item = Vector3<f32>>
    {
        points.into_iter()
            .fold(
                Aabb::empty(),
                |mut aabb, p| {
                    aabb.include_point(p);
                    aabb
                }
            )
    }

    /// Returns the smallest aabb that encloses all of the aabb in the given iterator.
    /// Returns an empty aabb if the given iterator was empty.
    pub fn union<A>(aabbs: A) -> Aabb
        where A: IntoIterator<Item = Aabb>
    {
        aabbs.into_iter()
            .fold(
                Aabb::empty(),
                |mut acc, aabb| {
                    acc.include(&aabb);
                    acc
                }
            )
    }

    pub fn include_point(&mut self, p: Vector3<f32>) {
        self.min = Vector3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Vector3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn include(&mut self, other: &Aabb) {
        self.include_point(other.min);
        self.include_point(other.max);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn centroid(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }

        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Clips the interval of the ray against the box with the slab method.
    ///
    /// Returns the entry and exit parameter of the part of `[tmin, tmax)`
    /// that lies inside the box, or `None` if the ray misses it. Axes the
    /// ray runs parallel to only reject if the origin lies outside the slab.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (mut t_enter, mut t_exit) = ray.interval_f32();

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let t0 = (lo - origin) * inv;
            let t1 = (hi - origin) * inv;
            let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            let far = far * (1.0 + SLAB_ERROR);

            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);

            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }
}
