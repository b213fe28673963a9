//! Contains the geometric primitives the queries rely on, among these
//! rays, triangles and the bounding volume hierarchy answering
//! nearest-hit queries.

pub mod aabb;
pub mod bvh;
pub mod intersect;
pub mod ray;
pub mod spatial;
pub mod tri;
