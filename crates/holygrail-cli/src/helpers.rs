//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and configuration file loading.

use std::path::Path;

use holygrail_web::WebConfig;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Server configuration
// ---------------------------------------------------------------------------

/// Load the `[server]` section from a TOML file.
///
/// Falls back to [`WebConfig::default`] if the file is missing, unparsable,
/// or the section is absent; individual missing keys keep their defaults.
pub fn load_web_config(path: &Path) -> WebConfig {
    let defaults = WebConfig::default();

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return defaults;
        }
    };

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            return defaults;
        }
    };

    let server = match table.get("server") {
        Some(toml::Value::Table(s)) => s,
        _ => return defaults,
    };

    WebConfig {
        bind_addr: server
            .get("bind")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .unwrap_or(defaults.bind_addr),
        port: server
            .get("port")
            .and_then(|v| v.as_integer())
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(defaults.port),
    }
}

/// Apply command-line overrides on top of a loaded configuration.
pub fn apply_overrides(mut config: WebConfig, bind: Option<String>, port: Option<u16>) -> WebConfig {
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_web_config(&dir.path().join("absent.toml"));
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn server_section_is_read() {
        let file = write_config("[server]\nbind = \"0.0.0.0\"\nport = 8080\n");
        let config = load_web_config(file.path());
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn partial_and_invalid_values_fall_back() {
        let file = write_config("[server]\nport = 70000\n");
        let config = load_web_config(file.path());
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 3000);

        let file = write_config("this is = = not toml");
        assert_eq!(load_web_config(file.path()).port, 3000);
    }

    #[test]
    fn flags_override_file() {
        let config = apply_overrides(WebConfig::default(), None, Some(9000));
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 9000);

        let config = apply_overrides(config, Some("::1".into()), None);
        assert_eq!(config.bind_addr, "::1");
        assert_eq!(config.port, 9000);
    }
}
