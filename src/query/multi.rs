//! Finds every front-facing hit along a ray, ordered by distance, using
//! nothing but repeated nearest-hit queries.
//!
//! After each hit the next query starts exactly at the distance of that
//! hit instead of a little behind it. All queries then share the very
//! same origin and direction, and the nearest-hit query typically answers
//! with the triangle that was just found, or with a neighbour sharing an
//! edge with it. Such self-hits are not recorded. Instead, the start of the
//! interval is pushed forward by an epsilon that doubles with every
//! consecutive self-hit, so a traversal escapes floating point coincidences
//! of any size in few queries, while the first push is small enough not to
//! jump over distinct triangles lying close together.

use crate::config::TraversalConfig;
use crate::geom::ray::Ray;

use super::{Hit, NearestHit};
use super::guard::OverflowGuard;
use super::single;

/// All hits found along a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    /// Front-facing hits with strictly increasing `t`
    pub hits: Vec<Hit>,
    /// Number of nearest-hit queries issued, at least one
    pub num_rays: usize,
    /// Set if the overflow guard stopped the traversal, in which case hits
    /// further along the ray may be missing
    pub truncated: bool
}

impl Traversal {
    pub fn first(&self) -> Option<&Hit> {
        self.hits.first()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Loop state of a single traversal.
struct TraversalState {
    /// Start of the interval of the next query, only ever moves forward
    lower_bound: f64,
    /// Triangle of the last recorded hit
    last_triangle: Option<usize>,
    consecutive_self_hits: u32,
    hits: Vec<Hit>,
    num_rays: usize
}

impl TraversalState {
    fn new(tmin: f64) -> TraversalState {
        TraversalState {
            lower_bound: tmin,
            last_triangle: None,
            consecutive_self_hits: 0,
            hits: Vec::new(),
            num_rays: 0
        }
    }

    /// Either the triangle that was just recorded or something no further
    /// away than the start of the interval. Before the first hit is
    /// recorded only hits right at the origin count as self-hits, so for
    /// rays starting at a positive `tmin` the first hit is always the one a
    /// single nearest-hit query would report.
    fn is_self_hit(&self, hit: &Hit) -> bool {
        match self.last_triangle {
            None => hit.t <= 0.0,
            Some(last) => hit.triangle_id == last || hit.t <= self.lower_bound
        }
    }

    fn escape(&mut self, epsilon_base: f64) {
        let escape = 2.0_f64.powi(self.consecutive_self_hits as i32) * epsilon_base;
        self.lower_bound += escape;
        self.consecutive_self_hits = self.consecutive_self_hits.saturating_add(1);
    }

    fn record(&mut self, hit: Hit) {
        debug_assert!(
            self.hits.last().map(|last| last.t < hit.t).unwrap_or(true),
            "Hits must be recorded in strictly increasing order"
        );

        // A first hit right at the start of the interval may have been
        // rounded to slightly below it
        self.lower_bound = self.lower_bound.max(hit.t);
        self.last_triangle = Some(hit.triangle_id);
        self.consecutive_self_hits = 0;
        self.hits.push(hit);
    }

    fn finish(self, truncated: bool) -> Traversal {
        Traversal {
            hits: self.hits,
            num_rays: self.num_rays,
            truncated
        }
    }
}

/// Collects all front-facing hits on `ray`, nearest first.
///
/// The traversal ends when a query comes back empty or when the overflow
/// guard trips because more than `config.max_hits` hits were found.
///
/// # Panics
///
/// If the acceleration structure answers with a hit outside the queried
/// interval, see `single::query`.
pub fn all_hits<A>(accel: &A, ray: &Ray, config: &TraversalConfig) -> Traversal
    where A: NearestHit + ?Sized
{
    let mut state = TraversalState::new(ray.tmin);
    let mut guard = OverflowGuard::new(config.max_hits);

    loop {
        let query_ray = ray.starting_at(state.lower_bound);
        state.num_rays += 1;

        let hit = match single::query(accel, &query_ray) {
            Some(hit) => hit,
            None => {
                trace!("Ray {} from t = {} missed, traversal done", state.num_rays, state.lower_bound);
                break;
            }
        };

        if state.is_self_hit(&hit) {
            state.escape(config.epsilon_base);
            trace!(
                "Ray {} hit triangle {} again at t = {}, pushed start to {} after {} self-hits",
                state.num_rays,
                hit.triangle_id,
                hit.t,
                state.lower_bound,
                state.consecutive_self_hits
            );
        } else {
            trace!("Ray {} hit triangle {} at t = {}", state.num_rays, hit.triangle_id, hit.t);
            state.record(hit);
        }

        if guard.check(&state.hits) {
            break;
        }
    }

    state.finish(guard.is_tripped())
}
