//! Error taxonomy for sampling, mutation and style combination.
//!
//! Every error is raised synchronously to the immediate caller. Nothing is
//! retried and no fallback vector is produced; a caller that wants to recover
//! (for example by dropping the prior and sampling fresh) does so itself.

use thiserror::Error;

/// Errors returned by the sampling core and the style combination step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    /// A weight vector's length does not match the historical collection size.
    #[error("weight vector has length {actual}, expected {expected}")]
    ShapeMismatch {
        /// Number of historical embeddings (`n_hist`).
        expected: usize,
        /// Length of the supplied weight vector.
        actual: usize,
    },

    /// Caller-supplied parameters are outside their valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Redistribution could not find enough zero positions for displaced mass.
    ///
    /// Unreachable while `n_dim_to_keep <= n_hist`; seeing it means an
    /// upstream invariant was broken.
    #[error("redistribution needs {needed} free positions but only {available} are zero")]
    InsufficientCapacity {
        /// Number of displaced magnitudes awaiting a new position.
        needed: usize,
        /// Number of zero positions available after vacating.
        available: usize,
    },

    /// Arithmetic left a vector without finite positive mass, or lost an
    /// active entry to underflow.
    ///
    /// Reachable only with extreme inputs such as a `std` near `f64::MAX`.
    #[error("numerically degenerate weights: {0}")]
    Degenerate(String),

    /// A record could not be encoded for hashing.
    #[error("could not encode record: {0}")]
    Encoding(String),

    /// An embedding row has a different dimension from the first row.
    #[error("embedding row {row} has dimension {actual}, expected {expected}")]
    RaggedEmbeddings {
        /// Index of the offending row.
        row: usize,
        /// Dimension of row 0.
        expected: usize,
        /// Dimension of the offending row.
        actual: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SamplerError>;
