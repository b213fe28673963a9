use super::Hit;

/// Stops traversals that keep finding hits, e.g. rays running tangent to
/// a large number of almost coplanar triangles.
///
/// Tripping the guard is not an error: the traversal returns what it
/// collected so far, flagged as truncated, after logging a single warning.
#[derive(Debug)]
pub struct OverflowGuard {
    max_hits: usize,
    tripped: bool
}

impl OverflowGuard {
    pub fn new(max_hits: usize) -> OverflowGuard {
        OverflowGuard {
            max_hits,
            tripped: false
        }
    }

    /// Returns `true` once more than `max_hits` hits have been collected,
    /// warning with the struck triangles and their distances the first time.
    pub fn check(&mut self, hits: &[Hit]) -> bool {
        if hits.len() <= self.max_hits {
            return false;
        }

        if !self.tripped {
            self.tripped = true;

            let ids = hits.iter()
                .map(|h| h.triangle_id.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            let distances = hits.iter()
                .map(|h| format!("{:.17}", h.t))
                .collect::<Vec<_>>()
                .join(" ");

            warn!(
                "Large number of hits, stopping traversal after {} hits. Triangles: [ {} ] Distances: [ {} ]",
                hits.len(),
                ids,
                distances
            );
        }

        true
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}
