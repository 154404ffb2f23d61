//! Engine error types.
//!
//! Every failure the sampling, authoring and grading engine can produce.
//! File and configuration boundaries wrap these in `anyhow` with path context.

use thiserror::Error;

/// Errors raised by the exam generation and grading engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// A weight callback returned a negative value.
    #[error("weights must be non-negative, got {0}")]
    InvalidWeight(i64),

    /// A negative number of items was requested.
    #[error("count must be non-negative, got {0}")]
    InvalidCount(i64),

    /// Fewer positive-weight items exist than were requested.
    #[error("not enough available items: got {available}, expected {requested}")]
    InsufficientCandidates { available: usize, requested: usize },

    /// The requested sampling does not fit the available pool, or an exam does
    /// not belong to a problem set.
    #[error("{0}")]
    Scheme(String),

    /// An id that must be new already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// An id that must exist was not found.
    #[error("unknown id: {0}")]
    UnknownId(String),

    /// A value ran past the range of its type.
    #[error("overflow: {0}")]
    Overflow(String),

    /// A grader name with no matching algorithm.
    #[error("unsupported grader: {0}")]
    UnsupportedGrader(String),
}

impl ExamError {
    /// Returns `true` for sampling precondition violations.
    ///
    /// These depend only on the inputs, so repeating the call cannot succeed.
    pub fn is_sampling(&self) -> bool {
        matches!(
            self,
            ExamError::InvalidWeight(_)
                | ExamError::InvalidCount(_)
                | ExamError::InsufficientCandidates { .. }
        )
    }
}
