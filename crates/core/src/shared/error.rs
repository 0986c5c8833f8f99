use std::path::PathBuf;

use thiserror::Error;

use crate::graph::domain::vertex::GraphSet;
use crate::shared::rect::Rect;

/// Malformed evaluation input. The page is rejected rather than
/// aggregated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{set} rectangle {index} has non-positive dimensions: {rect:?}")]
    DegenerateRect {
        set: GraphSet,
        index: usize,
        rect: Rect,
    },
    #[error("{set} rectangle {index} lies outside the {width}x{height} image: {rect:?}")]
    OutOfBounds {
        set: GraphSet,
        index: usize,
        rect: Rect,
        width: u32,
        height: u32,
    },
    #[error("{set} rectangle {index} counted {count} foreground pixels in an area of {area}")]
    CountExceedsArea {
        set: GraphSet,
        index: usize,
        count: u64,
        area: u64,
    },
    #[error("image dimensions differ: ground truth {gt:?}, hypothesis {hyp:?}")]
    DimensionMismatch { gt: (u32, u32), hyp: (u32, u32) },
    #[error("invalid page totals: {0}")]
    InvalidTotals(String),
    #[error("invalid evaluation config: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Tracker allocation or pixel buffer access failed.
    #[error("resource error: {0}")]
    Resource(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
