//! Bounding volume hierarchy over triangles, answering nearest-hit queries.
//!
//! Built once with a binned surface area heuristic and never modified
//! afterwards, so a built hierarchy can be shared freely between threads.

use std::f32::INFINITY;

use cgmath::Vector3;

use crate::error::{Error, Result};
use crate::query::{Hit, NearestHit};

use super::aabb::Aabb;
use super::intersect::{IntersectRay, Intersection};
use super::ray::Ray;
use super::spatial::Spatial;
use super::tri::Triangle;

const MAX_LEAF_TRIANGLES: usize = 4;
const NUM_BUCKETS: usize = 12;

/// A triangle as passed to `TriangleBvh::build`: three indices into the
/// vertex array and the number reported back as `Hit::triangle_id`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BuildTriangle {
    pub indices: [usize; 3],
    pub source_index: usize
}

impl BuildTriangle {
    pub fn new(indices: [usize; 3], source_index: usize) -> BuildTriangle {
        BuildTriangle { indices, source_index }
    }

    /// The same triangle with reversed winding, so its back side faces front.
    pub fn flipped(&self) -> BuildTriangle {
        let [i0, i1, i2] = self.indices;
        BuildTriangle::new([i0, i2, i1], self.source_index)
    }
}

#[derive(Debug, Clone)]
enum BvhNode {
    Leaf {
        aabb: Aabb,
        /// Indexes into `TriangleBvh::triangles`
        triangles: Vec<usize>
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>
    }
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb
        }
    }

    fn count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Internal { left, right, .. } => 1 + left.count() + right.count()
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth())
        }
    }
}

/// Owns a private copy of the triangles it was built from. Degenerate
/// triangles are left out since they can never be hit.
#[derive(Debug, Clone)]
pub struct TriangleBvh {
    root: Option<BvhNode>,
    triangles: Vec<Triangle>,
    source_indices: Vec<usize>,
    vertex_count: usize
}

impl TriangleBvh {
    /// Builds a hierarchy over the given indexed triangles.
    ///
    /// Fails if a triangle references a vertex that does not exist.
    /// An empty triangle list is fine and yields a hierarchy that never
    /// reports a hit.
    pub fn build(vertices: &[Vector3<f32>], triangles: &[BuildTriangle]) -> Result<TriangleBvh> {
        let mut resolved = Vec::with_capacity(triangles.len());
        let mut source_indices = Vec::with_capacity(triangles.len());
        let mut degenerate_count = 0;

        for (triangle_idx, build_tri) in triangles.iter().enumerate() {
            for &index in build_tri.indices.iter() {
                if index >= vertices.len() {
                    return Err(Error::VertexIndexOutOfRange {
                        triangle: triangle_idx,
                        index,
                        vertex_count: vertices.len()
                    });
                }
            }

            let [i0, i1, i2] = build_tri.indices;
            let tri = Triangle::new(vertices[i0], vertices[i1], vertices[i2]);

            if tri.is_degenerate() {
                degenerate_count += 1;
                continue;
            }

            resolved.push(tri);
            source_indices.push(build_tri.source_index);
        }

        if degenerate_count > 0 {
            warn!("Skipped {} degenerate triangles out of {} while building BVH", degenerate_count, triangles.len());
        }

        let mut build_data : Vec<(usize, Aabb, Vector3<f32>)> = resolved.iter()
            .enumerate()
            .map(|(idx, tri)| (idx, tri.bounds(), tri.centroid()))
            .collect();

        let root = if build_data.is_empty() {
            None
        } else {
            Some(build_node(&mut build_data))
        };

        if let Some(root) = root.as_ref() {
            debug!(
                "Built BVH over {} triangles with {} nodes and depth {}",
                resolved.len(),
                root.count(),
                root.depth()
            );
        } else {
            debug!("Built empty BVH, no ray will ever hit it");
        }

        Ok(TriangleBvh {
            root,
            triangles: resolved,
            source_indices,
            vertex_count: vertices.len()
        })
    }

    /// Number of triangles that can be hit, excluding degenerate ones.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn bounds(&self) -> Aabb {
        self.root.as_ref()
            .map(|r| *r.aabb())
            .unwrap_or_else(Aabb::empty)
    }

    fn nearest_in_node(&self, ray: &Ray, node: &BvhNode, closest: &mut Option<(usize, Intersection)>) {
        let closest_t = closest.as_ref().map(|&(_, i)| i.t).unwrap_or(INFINITY);

        match node.aabb().intersect_ray(ray) {
            Some((t_enter, _)) if t_enter <= closest_t => {},
            _ => return
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &tri_idx in triangles.iter() {
                    if let Some(intersection) = self.triangles[tri_idx].ray_intersection(ray) {
                        let is_closer = closest.as_ref()
                            .map(|&(_, c)| intersection.t < c.t)
                            .unwrap_or(true);

                        if is_closer {
                            *closest = Some((tri_idx, intersection));
                        }
                    }
                }
            },
            BvhNode::Internal { left, right, .. } => {
                // Visit the nearer child first so the farther one can be pruned
                let left_t = left.aabb().intersect_ray(ray).map(|(t, _)| t);
                let right_t = right.aabb().intersect_ray(ray).map(|(t, _)| t);

                match (left_t, right_t) {
                    (Some(lt), Some(rt)) => {
                        if lt <= rt {
                            self.nearest_in_node(ray, left, closest);
                            self.nearest_in_node(ray, right, closest);
                        } else {
                            self.nearest_in_node(ray, right, closest);
                            self.nearest_in_node(ray, left, closest);
                        }
                    },
                    (Some(_), None) => self.nearest_in_node(ray, left, closest),
                    (None, Some(_)) => self.nearest_in_node(ray, right, closest),
                    (None, None) => {}
                }
            }
        }
    }
}

impl NearestHit for TriangleBvh {
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        if ray.is_degenerate() {
            return None;
        }

        let root = self.root.as_ref()?;
        let mut closest = None;
        self.nearest_in_node(ray, root, &mut closest);

        closest.map(|(tri_idx, Intersection { t, u, v })| Hit {
            triangle_id: self.source_indices[tri_idx],
            u,
            v,
            t: t as f64
        })
    }
}

fn build_node(build_data: &mut [(usize, Aabb, Vector3<f32>)]) -> BvhNode {
    let bounds = Aabb::union(build_data.iter().map(|&(_, aabb, _)| aabb));

    if build_data.len() <= MAX_LEAF_TRIANGLES {
        return BvhNode::Leaf {
            aabb: bounds,
            triangles: build_data.iter().map(|&(idx, _, _)| idx).collect()
        };
    }

    let mid = match find_best_split(build_data, &bounds) {
        Some((axis, pos)) => partition(build_data, axis, pos),
        None => 0
    };

    // All centroids on one side, fall back to splitting in the middle
    let mid = if mid == 0 || mid == build_data.len() {
        build_data.len() / 2
    } else {
        mid
    };

    let (left_data, right_data) = build_data.split_at_mut(mid);

    BvhNode::Internal {
        aabb: bounds,
        left: Box::new(build_node(left_data)),
        right: Box::new(build_node(right_data))
    }
}

/// Finds the axis and position with the lowest surface area heuristic cost,
/// or `None` if no split puts triangles on both sides.
fn find_best_split(build_data: &[(usize, Aabb, Vector3<f32>)], bounds: &Aabb) -> Option<(usize, f32)> {
    let total_area = bounds.surface_area();
    let mut best : Option<(f32, usize, f32)> = None;

    for axis in 0..3 {
        let axis_min = bounds.min[axis];
        let axis_extent = bounds.max[axis] - axis_min;

        if axis_extent <= 0.0 {
            continue;
        }

        let mut bucket_counts = [0usize; NUM_BUCKETS];
        let mut bucket_bounds = [Aabb::empty(); NUM_BUCKETS];

        for &(_, aabb, centroid) in build_data.iter() {
            let b = ((centroid[axis] - axis_min) / axis_extent * NUM_BUCKETS as f32) as usize;
            let b = b.min(NUM_BUCKETS - 1);

            bucket_counts[b] += 1;
            bucket_bounds[b].include(&aabb);
        }

        for split in 1..NUM_BUCKETS {
            let left_count : usize = bucket_counts[..split].iter().sum();
            let right_count : usize = bucket_counts[split..].iter().sum();

            if left_count == 0 || right_count == 0 {
                continue;
            }

            let left_bounds = Aabb::union(bucket_bounds[..split].iter().cloned());
            let right_bounds = Aabb::union(bucket_bounds[split..].iter().cloned());

            // traversal cost + P(left) * N_left + P(right) * N_right
            let cost = 0.125 +
                left_bounds.surface_area() / total_area * left_count as f32 +
                right_bounds.surface_area() / total_area * right_count as f32;

            let is_better = best.map(|(best_cost, _, _)| cost < best_cost).unwrap_or(true);
            if is_better {
                let pos = axis_min + (split as f32 / NUM_BUCKETS as f32) * axis_extent;
                best = Some((cost, axis, pos));
            }
        }
    }

    best.map(|(_, axis, pos)| (axis, pos))
}

/// Moves everything with a centroid below `pos` to the front and returns
/// the count of those.
fn partition(build_data: &mut [(usize, Aabb, Vector3<f32>)], axis: usize, pos: f32) -> usize {
    let mut left = 0;
    let mut right = build_data.len();

    while left < right {
        if build_data[left].2[axis] < pos {
            left += 1;
        } else {
            right -= 1;
            build_data.swap(left, right);
        }
    }

    left
}
