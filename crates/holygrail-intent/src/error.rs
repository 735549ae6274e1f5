//! Intent error types.

/// Unified error type for the intent crate.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// The referenced workflow key is not in the registry.
    #[error("unknown workflow: {key}")]
    UnknownWorkflow { key: String },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, IntentError>;
