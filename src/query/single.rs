//! One nearest-hit query, with the result checked against the interval
//! that was asked for.

use cgmath::Vector3;

use crate::geom::ray::Ray;

use super::{Hit, NearestHit};

/// Asks the acceleration structure for the nearest front-facing hit on
/// `ray`. Rays that cannot hit anything, like rays with a zero direction,
/// are answered with `None` without bothering the acceleration structure.
///
/// # Panics
///
/// If the acceleration structure reports a hit outside the interval of
/// the ray. Continuing with such a hit would silently corrupt the order of
/// multi-hit traversals.
pub fn query<A>(accel: &A, ray: &Ray) -> Option<Hit>
    where A: NearestHit + ?Sized
{
    if ray.is_degenerate() {
        return None;
    }

    let hit = accel.nearest(ray)?;
    assert_within_interval(ray, &hit);
    Some(hit)
}

/// Nearest hit on the ray from `origin` along `direction`, starting at `tnear`.
pub fn intersect_ray<A>(accel: &A, origin: Vector3<f32>, direction: Vector3<f32>, tnear: f64) -> Option<Hit>
    where A: NearestHit + ?Sized
{
    query(accel, &Ray::new(origin, direction, tnear))
}

/// Nearest hit on the segment from `a` to `a + ab`, excluding the far end.
pub fn intersect_segment<A>(accel: &A, a: Vector3<f32>, ab: Vector3<f32>) -> Option<Hit>
    where A: NearestHit + ?Sized
{
    query(accel, &Ray::segment(a, ab))
}

/// Compares in the precision the triangle tests run at, since the bounds of
/// the interval are narrowed to that precision before testing.
fn assert_within_interval(ray: &Ray, hit: &Hit) {
    let (tmin, tmax) = ray.interval_f32();
    let t = hit.t as f32;

    if !(t >= tmin && t < tmax) {
        panic!(
            "Acceleration structure reported hit on triangle {} at t = {}, outside of queried interval [{}, {})",
            hit.triangle_id,
            hit.t,
            ray.tmin,
            ray.tmax
        );
    }
}
