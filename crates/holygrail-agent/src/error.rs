//! Agent error types.
//!
//! All agent subsystems surface errors through [`AgentError`].  Each variant
//! carries enough context for callers to decide how to handle the failure.

/// Unified error type for the query agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // -- LLM errors ----------------------------------------------------------
    /// An HTTP request to the LLM provider failed.
    #[error("llm request failed: {reason}")]
    LlmRequestFailed { reason: String },

    /// The LLM response could not be parsed into the expected format.
    #[error("llm response parse error: {reason}")]
    LlmParseFailed { reason: String },

    /// The API key is missing for a provider that requires one.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    // -- Configuration errors ------------------------------------------------
    /// A required setting is absent or unusable.
    #[error("{reason}")]
    ConfigError { reason: String },

    // -- Query errors --------------------------------------------------------
    /// Building the query agent or invoking it failed.
    #[error("Failed to query database: {cause}")]
    QueryFailed {
        #[source]
        cause: Box<AgentError>,
    },
}

impl AgentError {
    /// Whether this error (or the error it wraps) is caused by missing
    /// configuration rather than a failed call.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::ConfigError { .. } | Self::MissingApiKey { .. } => true,
            Self::QueryFailed { cause } => cause.is_configuration(),
            _ => false,
        }
    }
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        Self::LlmRequestFailed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failure_wraps_cause_message() {
        let err = AgentError::QueryFailed {
            cause: Box::new(AgentError::ConfigError {
                reason: "SUPABASE_DB_URL or DATABASE_URL not set".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "Failed to query database: SUPABASE_DB_URL or DATABASE_URL not set"
        );
        assert!(err.is_configuration());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn request_failure_is_not_configuration() {
        let err = AgentError::QueryFailed {
            cause: Box::new(AgentError::LlmRequestFailed {
                reason: "timeout".into(),
            }),
        };
        assert!(!err.is_configuration());
        assert!(AgentError::MissingApiKey { provider: "openai".into() }.is_configuration());
    }
}
