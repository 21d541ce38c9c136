//! Error types for the word service.

/// Errors produced by the active word buffer and the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    /// A submitted word was missing, of the wrong type, or blank.
    ///
    /// User-correctable; no mutation was performed.
    #[error("invalid word: {0}")]
    Validation(String),

    /// An internal invariant was broken (out-of-range slot index, empty
    /// candidate pool). The offending operation was skipped.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The service has shut down and no longer accepts requests.
    #[error("word service is shut down")]
    Closed,
}
