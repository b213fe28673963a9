//! Ray queries against an already built acceleration structure.
//!
//! The acceleration structure only ever answers with the single nearest
//! front-facing hit. `single` wraps that answer for callers, `multi` turns
//! repeated nearest-hit queries into the ordered list of every hit along
//! the ray and `guard` caps traversals that do not come to an end.

use std::sync::Arc;

use cgmath::Vector3;

use crate::geom::ray::Ray;

pub mod guard;
pub mod intersector;
pub mod multi;
pub mod single;

pub use self::intersector::Intersector;
pub use self::multi::Traversal;

/// A front-facing intersection of a ray with a triangle of the mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    /// Index of the struck triangle in the numbering the caller used when
    /// building the acceleration structure
    pub triangle_id: usize,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
    /// Ray parameter of the hit, in multiples of the direction length
    pub t: f64
}

impl Hit {
    /// Location of the hit on a ray with the given origin and direction
    pub fn point(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Vector3<f32> {
        origin + direction * (self.t as f32)
    }
}

/// A spatial index over a fixed set of triangles that can find the nearest
/// front-facing hit of a ray inside the interval of the ray.
///
/// Implementations must be safe to query from many threads at once if
/// they are shared between threads; nothing in this crate mutates them.
pub trait NearestHit {
    fn nearest(&self, ray: &Ray) -> Option<Hit>;
}

impl<'a, T> NearestHit for &'a T
    where T: NearestHit + ?Sized
{
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        (**self).nearest(ray)
    }
}

impl<T> NearestHit for Box<T>
    where T: NearestHit + ?Sized
{
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        (**self).nearest(ray)
    }
}

impl<T> NearestHit for Arc<T>
    where T: NearestHit + ?Sized
{
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        (**self).nearest(ray)
    }
}
