//! Error types for purity-candidate selection.

use thiserror::Error;

/// Errors from purity-candidate selection.
///
/// An insufficient candidate count is NOT an error: the adaptive threshold
/// cascade handles it internally and may legitimately return an empty
/// candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The matrix or the selection parameters violate the entry contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The matrix is constant: its global maximum equals its global minimum,
    /// so [0, 1] normalization is undefined and no pixel can be extremal.
    #[error("degenerate input: global maximum equals global minimum")]
    DegenerateInput,

    /// The cancellation token was set; selection stopped between projection
    /// batches with no partial results.
    #[error("selection cancelled")]
    Cancelled,
}
