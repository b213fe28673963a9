//! Tunables of the multi-hit traversal.

use std::f32;

use crate::error::{Error, Result};
use crate::geom::ray::DEFAULT_RAY_TNEAR;

/// Hits collected before a traversal is considered runaway.
pub const DEFAULT_MAX_HITS: usize = 1000;

/// Parameters controlling how rays are shot and how far self-hits are escaped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TraversalConfig {
    /// First forward push after a self-hit, doubled on every further
    /// consecutive self-hit. Has to match the precision the acceleration
    /// structure computes distances in: too small and rays get stuck on the
    /// same triangle for many queries, too large and distinct hits that are
    /// closer together than this are dropped.
    pub epsilon_base: f64,
    /// Once more hits than this have been collected, the traversal stops and
    /// reports a truncated result.
    pub max_hits: usize,
    /// Start of the interval of rays shot from a caller supplied origin,
    /// positive so the origin itself is never hit.
    pub ray_tnear: f64
}

impl Default for TraversalConfig {
    fn default() -> TraversalConfig {
        TraversalConfig {
            epsilon_base: f32::EPSILON as f64,
            max_hits: DEFAULT_MAX_HITS,
            ray_tnear: DEFAULT_RAY_TNEAR
        }
    }
}

impl TraversalConfig {
    pub fn builder() -> TraversalConfigBuilder {
        TraversalConfigBuilder::new()
    }
}

/// Builds a validated `TraversalConfig`, starting out from the defaults.
///
/// # Examples
///
/// ```
/// use trihits::TraversalConfig;
///
/// let config = TraversalConfig::builder()
///     .epsilon_base(1e-6)
///     .max_hits(64)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_hits, 64);
/// ```
pub struct TraversalConfigBuilder {
    config: TraversalConfig
}

impl TraversalConfigBuilder {
    pub fn new() -> TraversalConfigBuilder {
        TraversalConfigBuilder {
            config: TraversalConfig::default()
        }
    }

    pub fn epsilon_base(mut self, epsilon_base: f64) -> TraversalConfigBuilder {
        self.config.epsilon_base = epsilon_base;
        self
    }

    pub fn max_hits(mut self, max_hits: usize) -> TraversalConfigBuilder {
        self.config.max_hits = max_hits;
        self
    }

    pub fn ray_tnear(mut self, ray_tnear: f64) -> TraversalConfigBuilder {
        self.config.ray_tnear = ray_tnear;
        self
    }

    pub fn build(self) -> Result<TraversalConfig> {
        let TraversalConfig { epsilon_base, max_hits, ray_tnear } = self.config;

        if !(epsilon_base > 0.0) || !epsilon_base.is_finite() {
            return Err(Error::InvalidConfig(format!("epsilon_base must be positive and finite, got {}", epsilon_base)));
        }

        // Rays shot from a point on the mesh would strike that point at t = 0
        if !(ray_tnear > 0.0) || !ray_tnear.is_finite() {
            return Err(Error::InvalidConfig(format!("ray_tnear must be positive and finite, got {}", ray_tnear)));
        }

        if max_hits == 0 {
            return Err(Error::InvalidConfig(String::from("max_hits must be at least one")));
        }

        Ok(self.config)
    }
}

impl Default for TraversalConfigBuilder {
    fn default() -> TraversalConfigBuilder {
        TraversalConfigBuilder::new()
    }
}
