use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

/// Everything that can go wrong before the first ray is shot.
///
/// Queries themselves never fail: a miss is `None`, a runaway traversal
/// is truncated and logged.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("triangle {triangle} references vertex {index}, but there are only {vertex_count} vertices")]
    VertexIndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize
    },
    #[error("flat {name} array has length {len}, which is not a multiple of three")]
    MalformedFlatArray {
        name: &'static str,
        len: usize
    },
    #[error("invalid traversal configuration: {0}")]
    InvalidConfig(String)
}
