//!
//! Contains functionality for triangles.
//!

use cgmath::Vector3;
use cgmath::prelude::*;

use super::spatial::Spatial;
use super::aabb::Aabb;
use super::intersect::{IntersectRay, Intersection};
use super::ray::Ray;

/// Three vertex positions, wound counter-clockwise when looking at the
/// front side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector3<f32>; 3]
}

impl Spatial for Triangle {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().cloned())
    }

    fn centroid(&self) -> Vector3<f32> {
        let one_over_three = 1.0 / 3.0;
        self.vertices.iter()
            .map(|v| *v * one_over_three)
            .sum()
    }
}

impl Triangle {
    pub fn new(vertex0: Vector3<f32>, vertex1: Vector3<f32>, vertex2: Vector3<f32>) -> Triangle {
        Triangle {
            vertices: [vertex0, vertex1, vertex2]
        }
    }

    /// Non-normalized normal pointing out of the front side
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    pub fn area(&self) -> f32 {
        0.5 * self.normal().magnitude()
    }

    /// Degenerate triangles have no area and can never be hit.
    pub fn is_degenerate(&self) -> bool {
        let area = self.area();
        area == 0.0 || !area.is_finite()
    }
}

impl IntersectRay for Triangle {
    /// Möller-Trumbore with back-face culling, carried out in single precision.
    ///
    /// Points on edges and vertices count as inside, so a ray through a
    /// shared edge hits both adjacent triangles at the same `t`.
    fn ray_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let [vertex0, vertex1, vertex2] = self.vertices;
        let (tmin, tmax) = ray.interval_f32();

        let edge1 = vertex1 - vertex0;
        let edge2 = vertex2 - vertex0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Negative determinant means we are looking at the back side,
        // zero means parallel or degenerate
        if !(a > 0.0) || !a.is_finite() {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - vertex0;
        let u = f * s.dot(h);

        if u < 0.0 || u > 1.0 {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        if v < 0.0 || (u + v) > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);

        if t < tmin || t >= tmax {
            return None;
        }

        Some(Intersection { t, u, v })
    }
}
