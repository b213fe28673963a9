use cgmath::Vector3;

use super::aabb::Aabb;

/// Something with a position and extent in space that can be sorted into
/// a bounding volume hierarchy.
pub trait Spatial {
    /// Axis aligned bounding box of the spatial object
    fn bounds(&self) -> Aabb;

    /// Point used to decide which side of a split the object goes to
    fn centroid(&self) -> Vector3<f32> {
        self.bounds().centroid()
    }
}

