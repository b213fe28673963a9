use cgmath::Vector3;

use crate::config::TraversalConfig;
use crate::error::{Error, Result};
use crate::geom::bvh::{BuildTriangle, TriangleBvh};
use crate::geom::ray::Ray;

use super::{Hit, NearestHit};
use super::multi::{self, Traversal};
use super::single;

/// Shoots rays at a triangle mesh and reports front-facing hits.
///
/// A triangle is front-facing if its vertices appear counter-clockwise
/// when seen from the ray origin. To find hits on both sides, build with
/// `Intersector::double_sided`.
///
/// # Examples
///
/// ```
/// use cgmath::Vector3;
/// use trihits::Intersector;
///
/// // A unit square in the z=0 plane, facing up
/// let positions = vec![
///     Vector3::new(0.0, 0.0, 0.0),
///     Vector3::new(1.0, 0.0, 0.0),
///     Vector3::new(1.0, 1.0, 0.0),
///     Vector3::new(0.0, 1.0, 0.0)
/// ];
/// let intersector = Intersector::new(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
///
/// let origin = Vector3::new(0.25, 0.75, 1.0);
/// let down = Vector3::new(0.0, 0.0, -1.0);
///
/// let hit = intersector.intersect_ray(origin, down).unwrap();
/// assert_eq!(hit.triangle_id, 1);
/// assert_eq!(hit.t, 1.0);
///
/// let traversal = intersector.intersect_ray_all(origin, down);
/// assert_eq!(traversal.hits, vec![hit]);
/// ```
pub struct Intersector<A = TriangleBvh>
    where A: NearestHit
{
    accel: A,
    config: TraversalConfig
}

impl Intersector<TriangleBvh> {
    /// Builds an intersector over the given faces, reporting face `i` as
    /// triangle `i`.
    pub fn new(positions: &[Vector3<f32>], faces: &[[usize; 3]]) -> Result<Intersector<TriangleBvh>> {
        let triangles = faces.iter()
            .enumerate()
            .map(|(idx, &indices)| BuildTriangle::new(indices, idx))
            .collect::<Vec<_>>();

        Ok(Intersector::from_handle(TriangleBvh::build(positions, &triangles)?))
    }

    /// Builds from flat arrays as found in OBJ loaders, with three
    /// coordinates per vertex and three indices per face.
    pub fn from_flat(positions: &[f32], indices: &[u32]) -> Result<Intersector<TriangleBvh>> {
        if positions.len() % 3 != 0 {
            return Err(Error::MalformedFlatArray { name: "positions", len: positions.len() });
        }

        if indices.len() % 3 != 0 {
            return Err(Error::MalformedFlatArray { name: "indices", len: indices.len() });
        }

        let positions = positions.chunks(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect::<Vec<_>>();
        let faces = indices.chunks(3)
            .map(|i| [i[0] as usize, i[1] as usize, i[2] as usize])
            .collect::<Vec<_>>();

        Intersector::new(&positions, &faces)
    }

    /// Builds an intersector that also reports hits on the back side of
    /// faces, by adding every face a second time with reversed winding.
    /// Both sides of face `i` are reported as triangle `i`.
    pub fn double_sided(positions: &[Vector3<f32>], faces: &[[usize; 3]]) -> Result<Intersector<TriangleBvh>> {
        let front = faces.iter()
            .enumerate()
            .map(|(idx, &indices)| BuildTriangle::new(indices, idx))
            .collect::<Vec<_>>();
        let back = front.iter()
            .map(BuildTriangle::flipped)
            .collect::<Vec<_>>();

        let triangles = [front, back].concat();

        Ok(Intersector::from_handle(TriangleBvh::build(positions, &triangles)?))
    }
}

impl<A> Intersector<A>
    where A: NearestHit
{
    /// Wraps an already built acceleration structure, with default
    /// traversal configuration.
    pub fn from_handle(accel: A) -> Intersector<A> {
        Intersector {
            accel,
            config: TraversalConfig::default()
        }
    }

    pub fn with_config(mut self, config: TraversalConfig) -> Intersector<A> {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn accel(&self) -> &A {
        &self.accel
    }

    /// Nearest front-facing hit on the ray from `origin` along `direction`.
    /// The direction does not need to be normalized, `Hit::t` is measured in
    /// multiples of its length.
    pub fn intersect_ray(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Option<Hit> {
        single::intersect_ray(&self.accel, origin, direction, self.config.ray_tnear)
    }

    /// All front-facing hits on the ray, nearest first, together with the
    /// number of rays that were shot to find them.
    pub fn intersect_ray_all(&self, origin: Vector3<f32>, direction: Vector3<f32>) -> Traversal {
        let ray = Ray::new(origin, direction, self.config.ray_tnear);
        multi::all_hits(&self.accel, &ray, &self.config)
    }

    /// Like `intersect_ray_all`, but only considers hits before `tmax`.
    pub fn intersect_ray_all_within(&self, origin: Vector3<f32>, direction: Vector3<f32>, tmax: f64) -> Traversal {
        let ray = Ray {
            tmax,
            ..Ray::new(origin, direction, self.config.ray_tnear)
        };
        multi::all_hits(&self.accel, &ray, &self.config)
    }

    /// Nearest front-facing hit on the segment from `a` to `a + ab`.
    /// `Hit::t` is in `[0, 1)`.
    pub fn intersect_segment(&self, a: Vector3<f32>, ab: Vector3<f32>) -> Option<Hit> {
        single::intersect_segment(&self.accel, a, ab)
    }
}
