use cgmath::Vector3;

use super::ray::Ray;

/// Where a ray struck a surface: the ray parameter and the barycentric
/// weights of the second and third vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub t: f32,
    pub u: f32,
    pub v: f32
}

pub trait IntersectRay {
    /// Finds the intersection of the ray with the front side of `self`
    /// inside the interval of the ray, if any.
    fn ray_intersection(&self, ray: &Ray) -> Option<Intersection>;

    fn ray_intersection_point(&self, ray: &Ray) -> Option<Vector3<f32>> {
        self.ray_intersection(ray)
            .map(|i| ray.at(i.t as f64))
    }
}
