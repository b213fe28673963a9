//! Ray queries against triangle meshes that report either the nearest
//! front-facing hit or every front-facing hit along a ray, in order.
//!
//! The multi-hit traversal in `query::multi` only relies on a nearest-hit
//! query, abstracted as `NearestHit`. `TriangleBvh` is the implementation
//! that comes with the crate.

#[macro_use]
extern crate log;
extern crate cgmath;
extern crate thiserror;

mod config;
mod error;
pub mod geom;
pub mod query;

pub use config::{TraversalConfig, TraversalConfigBuilder, DEFAULT_MAX_HITS};
pub use error::{Error, Result};
pub use geom::bvh::{BuildTriangle, TriangleBvh};
pub use geom::ray::{Ray, DEFAULT_RAY_TNEAR};
pub use query::{Hit, Intersector, NearestHit, Traversal};
