//! Environment-backed settings.
//!
//! Settings are read through an [`EnvSource`] rather than straight from the
//! process environment so the server can be embedded with explicit values.
//! [`ProcessEnv`] is the production source; [`MemoryEnv`] holds values in
//! memory.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::error::{AgentError, Result};

/// Credential for the language model provider.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Primary data source connection string.
pub const PRIMARY_DB_URL_VAR: &str = "SUPABASE_DB_URL";

/// Fallback data source connection string.
pub const FALLBACK_DB_URL_VAR: &str = "DATABASE_URL";

/// Optional override of the OpenAI-compatible API base URL.
pub const API_BASE_URL_VAR: &str = "HOLYGRAIL_API_BASE_URL";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A read-only view of named settings.
pub trait EnvSource: Send + Sync {
    /// Return the value of `name`, or `None` if it is unset or empty.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        env_non_empty(name)
    }
}

/// Read an environment variable, treating empty values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// In-memory settings that can be changed at runtime.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.into(), value.into());
        }
    }

    /// Remove a value.
    pub fn remove(&self, name: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(name);
        }
    }
}

impl EnvSource for MemoryEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(name).cloned())
            .filter(|v| !v.is_empty())
    }
}

/// Whether a language model credential is configured.
pub fn llm_configured(env: &dyn EnvSource) -> bool {
    env.get(OPENAI_API_KEY_VAR).is_some()
}

/// The configured data source connection string, primary before fallback.
pub fn database_url(env: &dyn EnvSource) -> Option<String> {
    env.get(PRIMARY_DB_URL_VAR)
        .or_else(|| env.get(FALLBACK_DB_URL_VAR))
}

// ---------------------------------------------------------------------------
// Query settings
// ---------------------------------------------------------------------------

/// Everything needed to build a query agent.
#[derive(Clone)]
pub struct QueryConfig {
    pub api_key: String,
    pub database_url: String,
    /// Overrides the provider's default base URL when set.
    pub base_url: Option<String>,
}

impl QueryConfig {
    /// Resolve settings from `env`.
    ///
    /// # Errors
    ///
    /// [`AgentError::ConfigError`] when neither connection string is set,
    /// [`AgentError::MissingApiKey`] when the credential is absent.
    pub fn resolve(env: &dyn EnvSource) -> Result<Self> {
        let database_url = database_url(env).ok_or_else(|| AgentError::ConfigError {
            reason: format!("{PRIMARY_DB_URL_VAR} or {FALLBACK_DB_URL_VAR} not set"),
        })?;

        let api_key = env
            .get(OPENAI_API_KEY_VAR)
            .ok_or_else(|| AgentError::MissingApiKey {
                provider: "openai".into(),
            })?;

        Ok(Self {
            api_key,
            database_url,
            base_url: env.get(API_BASE_URL_VAR),
        })
    }
}

impl fmt::Debug for QueryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryConfig")
            .field("api_key", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_connection_string_wins() {
        let env = MemoryEnv::new()
            .with(OPENAI_API_KEY_VAR, "sk-test")
            .with(PRIMARY_DB_URL_VAR, "postgres://primary/db")
            .with(FALLBACK_DB_URL_VAR, "postgres://fallback/db");
        let config = QueryConfig::resolve(&env).unwrap();
        assert_eq!(config.database_url, "postgres://primary/db");
        assert_eq!(config.api_key, "sk-test");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn fallback_connection_string_is_used() {
        let env = MemoryEnv::new()
            .with(OPENAI_API_KEY_VAR, "sk-test")
            .with(PRIMARY_DB_URL_VAR, "")
            .with(FALLBACK_DB_URL_VAR, "postgres://fallback/db");
        let config = QueryConfig::resolve(&env).unwrap();
        assert_eq!(config.database_url, "postgres://fallback/db");
    }

    #[test]
    fn missing_connection_string_is_config_error() {
        let env = MemoryEnv::new().with(OPENAI_API_KEY_VAR, "sk-test");
        let err = QueryConfig::resolve(&env).unwrap_err();
        assert!(matches!(err, AgentError::ConfigError { .. }));
        assert_eq!(err.to_string(), "SUPABASE_DB_URL or DATABASE_URL not set");
    }

    #[test]
    fn missing_key_is_reported() {
        let env = MemoryEnv::new().with(FALLBACK_DB_URL_VAR, "postgres://x/db");
        let err = QueryConfig::resolve(&env).unwrap_err();
        assert!(matches!(err, AgentError::MissingApiKey { .. }));
        assert!(!llm_configured(&env));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let env = MemoryEnv::new()
            .with(OPENAI_API_KEY_VAR, "sk-secret")
            .with(PRIMARY_DB_URL_VAR, "postgres://user:pw@host/db");
        let rendered = format!("{:?}", QueryConfig::resolve(&env).unwrap());
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("pw@"));
    }

    #[test]
    fn memory_env_set_and_remove() {
        let env = MemoryEnv::new();
        env.set("A", "1");
        assert_eq!(env.get("A").as_deref(), Some("1"));
        env.remove("A");
        assert_eq!(env.get("A"), None);
    }
}
