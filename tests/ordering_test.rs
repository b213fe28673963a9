extern crate trihits;
extern crate cgmath;
#[macro_use] extern crate log;
extern crate simplelog;
extern crate chrono;
extern crate rand;

mod common;

use std::cell::Cell;

use cgmath::Vector3;
use cgmath::prelude::*;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use trihits::{BuildTriangle, Hit, Intersector, NearestHit, Ray, TraversalConfig, TriangleBvh, DEFAULT_RAY_TNEAR};
use trihits::geom::intersect::IntersectRay;
use trihits::geom::tri::Triangle;

use common::{down, stacked_squares, fan};

/// Small triangles facing the origin, one every unit along the z axis,
/// none of them touching another
fn disjoint_column(count: usize) -> (Vec<Vector3<f32>>, Vec<[usize; 3]>) {
    let mut positions = Vec::new();
    let mut faces = Vec::new();

    for k in 0..count {
        let z = -(k as f32) - 1.0;
        let base = positions.len();
        positions.push(Vector3::new(-0.2, -0.2, z));
        positions.push(Vector3::new(0.3, -0.1, z));
        positions.push(Vector3::new(0.0, 0.3, z));
        faces.push([base, base + 1, base + 2]);
    }

    (positions, faces)
}

/// Passes queries on to a real acceleration structure and counts them
struct Counted<A> {
    inner: A,
    queries: Cell<usize>
}

impl<A> Counted<A> {
    fn new(inner: A) -> Counted<A> {
        Counted { inner, queries: Cell::new(0) }
    }

    /// Queries since the last call
    fn take(&self) -> usize {
        self.queries.replace(0)
    }
}

impl<A: NearestHit> NearestHit for Counted<A> {
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        self.queries.set(self.queries.get() + 1);
        self.inner.nearest(ray)
    }
}

/// Random triangles in the cube [-1, 1]^3
fn triangle_soup(rng: &mut StdRng, count: usize) -> (Vec<Vector3<f32>>, Vec<[usize; 3]>) {
    let positions = (0..(3 * count))
        .map(|_| Vector3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0)
        ))
        .collect::<Vec<_>>();
    let faces = (0..count)
        .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
        .collect::<Vec<_>>();

    (positions, faces)
}

/// Random rays starting outside of the soup, aimed at a point inside it
fn random_ray(rng: &mut StdRng) -> (Vector3<f32>, Vector3<f32>) {
    let origin = Vector3::new(
        rng.gen_range(-1.0f32..1.0),
        rng.gen_range(-1.0f32..1.0),
        rng.gen_range(-1.0f32..1.0)
    ).normalize() * 3.0;
    let target = Vector3::new(
        rng.gen_range(-0.5f32..0.5),
        rng.gen_range(-0.5f32..0.5),
        rng.gen_range(-0.5f32..0.5)
    );

    (origin, target - origin)
}

#[test]
fn disjoint_triangles_are_all_hit_in_order() {
    common::init_logging("ordering");

    let (positions, faces) = disjoint_column(25);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let traversal = intersector.intersect_ray_all(Vector3::new(0.0, 0.0, 0.0), down());
    info!("Column of 25 triangles took {} rays", traversal.num_rays);

    assert_eq!(traversal.len(), 25);
    assert!(!traversal.truncated);

    for (k, hit) in traversal.hits.iter().enumerate() {
        assert_eq!(hit.triangle_id, k, "Triangles should be struck from nearest to farthest");
        assert!((hit.t - (k as f64 + 1.0)).abs() < 1e-5, "Expected hit {} at t = {}, got {}", k, k + 1, hit.t);
    }
}

#[test]
fn miss_shoots_a_single_ray() {
    common::init_logging("ordering");

    let (positions, faces) = stacked_squares(&[0.0, 1.0]);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let beside = intersector.intersect_ray_all(Vector3::new(3.0, 3.0, 5.0), down());
    assert!(beside.is_empty());
    assert_eq!(beside.num_rays, 1);

    let away = intersector.intersect_ray_all(Vector3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, 1.0));
    assert!(away.is_empty());
    assert_eq!(away.num_rays, 1);
}

#[test]
fn stacked_squares_scenario() {
    common::init_logging("ordering");

    let (positions, faces) = stacked_squares(&[0.0, 1.0, 2.0]);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let traversal = intersector.intersect_ray_all(Vector3::new(0.5, 0.5, 5.0), down());
    let ts = traversal.hits.iter().map(|h| h.t).collect::<Vec<_>>();

    assert_eq!(ts, vec![3.0, 4.0, 5.0]);
}

#[test]
fn single_square_scenario() {
    common::init_logging("ordering");

    let (positions, faces) = stacked_squares(&[0.0]);
    let triangles = faces.iter()
        .enumerate()
        .map(|(idx, &indices)| BuildTriangle::new(indices, idx))
        .collect::<Vec<_>>();
    let counted = Counted::new(TriangleBvh::build(&positions, &triangles).unwrap());
    let intersector = Intersector::from_handle(&counted);
    let origin = Vector3::new(0.5, 0.5, 1.0);

    let hit = intersector.intersect_ray(origin, down()).unwrap();
    assert_eq!(hit.t, 1.0);
    assert!(hit.triangle_id < 2);
    assert_eq!(counted.take(), 1, "Nearest hit must be found with a single query");

    let traversal = intersector.intersect_ray_all(origin, down());
    assert_eq!(traversal.len(), 1);
    assert_eq!(traversal.hits[0], hit);
    assert_eq!(counted.take(), traversal.num_rays);
}

#[test]
fn origin_on_triangle_is_not_a_hit() {
    common::init_logging("ordering");

    let (positions, faces) = stacked_squares(&[-1.0, 0.0]);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let traversal = intersector.intersect_ray_all(Vector3::new(0.25, 0.75, 0.0), down());
    assert_eq!(traversal.len(), 1);
    assert_eq!(traversal.hits[0].t, 1.0);
    assert_eq!(traversal.hits[0].triangle_id / 2, 0, "Only the lower square lies ahead of the origin");
}

#[test]
fn origin_on_triangle_without_ray_offset() {
    common::init_logging("ordering");

    assert!(TraversalConfig::builder().ray_tnear(0.0).build().is_err());

    // The fields are public, so a zero offset can still be set by hand
    let config = TraversalConfig { ray_tnear: 0.0, ..TraversalConfig::default() };
    let (positions, faces) = stacked_squares(&[-1.0, 0.0]);
    let intersector = Intersector::new(&positions, &faces).unwrap().with_config(config);

    let traversal = intersector.intersect_ray_all(Vector3::new(0.25, 0.75, 0.0), down());
    assert_eq!(traversal.len(), 1, "Triangle under the origin must not be reported, got {:?}", traversal.hits);
    assert_eq!(traversal.hits[0].t, 1.0);
    assert_eq!(traversal.hits[0].triangle_id / 2, 0);
}

#[test]
fn shared_vertex_of_fan_is_reported_once() {
    common::init_logging("ordering");

    let (positions, faces) = fan();
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let traversal = intersector.intersect_ray_all(Vector3::new(0.0, 0.0, 1.0), down());
    info!("Ray through fan center took {} rays", traversal.num_rays);

    assert_eq!(traversal.len(), 1, "All fan triangles meet in one point, expected a single hit but got {:?}", traversal.hits);
    assert_eq!(traversal.hits[0].t, 1.0);
}

#[test]
fn zero_direction_is_a_miss() {
    common::init_logging("ordering");

    let (positions, faces) = stacked_squares(&[0.0]);
    let intersector = Intersector::new(&positions, &faces).unwrap();
    let still = Vector3::new(0.0, 0.0, 0.0);

    assert_eq!(intersector.intersect_ray(Vector3::new(0.5, 0.5, 1.0), still), None);
    assert!(intersector.intersect_ray_all(Vector3::new(0.5, 0.5, 1.0), still).is_empty());
    assert_eq!(intersector.intersect_segment(Vector3::new(0.5, 0.5, 1.0), still), None);
}

#[test]
fn random_soup_matches_brute_force() {
    common::init_logging("ordering");

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let (positions, faces) = triangle_soup(&mut rng, 300);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let triangles = faces.iter()
        .map(|&[a, b, c]| Triangle::new(positions[a], positions[b], positions[c]))
        .collect::<Vec<_>>();

    let mut total_hits = 0;

    for _ in 0..200 {
        let (origin, direction) = random_ray(&mut rng);
        let ray = Ray::new(origin, direction, DEFAULT_RAY_TNEAR);

        let mut expected = triangles.iter()
            .enumerate()
            .filter_map(|(id, tri)| tri.ray_intersection(&ray).map(|i| (i.t as f64, id)))
            .collect::<Vec<_>>();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let traversal = intersector.intersect_ray_all(origin, direction);
        let found = traversal.hits.iter()
            .map(|h| (h.t, h.triangle_id))
            .collect::<Vec<_>>();

        assert_eq!(found, expected, "Ray from {:?} along {:?}", origin, direction);
        total_hits += found.len();
    }

    info!("{} hits along 200 random rays", total_hits);
    assert!(total_hits > 0, "Random rays should hit some of the soup");
}

#[test]
fn single_and_all_hits_agree() {
    common::init_logging("ordering");

    let mut rng = StdRng::seed_from_u64(17);
    let (positions, faces) = triangle_soup(&mut rng, 200);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    for _ in 0..200 {
        let (origin, direction) = random_ray(&mut rng);

        let single = intersector.intersect_ray(origin, direction);
        let traversal = intersector.intersect_ray_all(origin, direction);

        assert_eq!(single.as_ref(), traversal.first());

        let again = intersector.intersect_ray_all(origin, direction);
        assert_eq!(again, traversal, "Repeating a query should give identical results");

        for pair in traversal.hits.windows(2) {
            assert!(pair[0].t < pair[1].t);
            assert!(pair[0].triangle_id != pair[1].triangle_id);
        }
    }
}

#[test]
fn segment_hits_stay_within_segment() {
    common::init_logging("ordering");

    let mut rng = StdRng::seed_from_u64(99);
    let (positions, faces) = triangle_soup(&mut rng, 200);
    let intersector = Intersector::new(&positions, &faces).unwrap();

    let mut hit_count = 0;

    for _ in 0..300 {
        let (a, towards_target) = random_ray(&mut rng);
        let ab = towards_target * rng.gen_range(0.1f32..2.0);

        if let Some(hit) = intersector.intersect_segment(a, ab) {
            assert!(hit.t >= 0.0 && hit.t < 1.0, "Segment hit at t = {} outside of [0, 1)", hit.t);

            let nearest_on_ray = intersector.accel().nearest(&Ray::new(a, ab, 0.0));
            assert_eq!(nearest_on_ray, Some(hit), "Segment hit must be the nearest hit of the ray as well");
            hit_count += 1;
        }
    }

    assert!(hit_count > 0);
}
