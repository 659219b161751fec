//! Errors raised while validating landmark input.

use thiserror::Error;

/// A landmark set the classifier refuses to guess from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoseError {
    #[error("invalid landmark set: expected {expected} points, found {found}")]
    InvalidInput { expected: usize, found: usize },

    #[error("invalid landmark set: point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

pub type Result<T> = std::result::Result<T, PoseError>;
