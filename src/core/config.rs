//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.rental-client/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Relative paths are resolved against `~/.rental-client/`.
    pub token_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_FILE: &str = "session.json";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

const CONFIG_DIR: &str = ".rental-client";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub token_file: PathBuf,
    pub log_level: log::LevelFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.rental-client/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_DIR))
}

/// Returns the path to `~/.rental-client/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.rental-client/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ClientConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ClientConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ClientConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ClientConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Rental client configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "http://localhost:8080"   # Or set RENTAL_API_BASE_URL
# timeout_secs = 30

# [session]
# token_file = "session.json"          # Relative to ~/.rental-client/, or RENTAL_TOKEN_FILE

# [logging]
# level = "debug"                      # "off", "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_base_url` comes from the `--base-url` flag (None = not specified).
pub fn resolve(config: &ClientConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_base_url, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env<F>(config: &ClientConfig, cli_base_url: Option<&str>, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| env("RENTAL_API_BASE_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Token file: env → config → default
    let token_file = env("RENTAL_TOKEN_FILE")
        .or_else(|| config.session.token_file.clone())
        .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string());

    let level_name = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = level_name.parse().unwrap_or_else(|_| {
        warn!("Unknown log level {:?}, using {}", level_name, DEFAULT_LOG_LEVEL);
        log::LevelFilter::Debug
    });

    ResolvedConfig {
        base_url,
        timeout_secs: config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        token_file: resolve_token_path(&token_file),
        log_level,
    }
}

/// Relative token paths live under `~/.rental-client/`; absolute ones are kept.
fn resolve_token_path(token_file: &str) -> PathBuf {
    let path = PathBuf::from(token_file);
    if path.is_absolute() {
        return path;
    }
    match config_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = ClientConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.session.token_file.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ClientConfig::default();
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(resolved.token_file.ends_with(DEFAULT_TOKEN_FILE));
        assert_eq!(resolved.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ClientConfig {
            api: ApiConfig {
                base_url: Some("http://api.example".to_string()),
                timeout_secs: Some(5),
            },
            session: SessionConfig {
                token_file: Some("/tmp/tok.json".to_string()),
            },
            logging: LoggingConfig {
                level: Some("warn".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.base_url, "http://api.example");
        assert_eq!(resolved.timeout_secs, 5);
        assert_eq!(resolved.token_file, PathBuf::from("/tmp/tok.json"));
        assert_eq!(resolved.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_env_wins_over_config() {
        let config = ClientConfig {
            api: ApiConfig {
                base_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, |key| match key {
            "RENTAL_API_BASE_URL" => Some("http://from-env".to_string()),
            "RENTAL_TOKEN_FILE" => Some("/var/tmp/env-token.json".to_string()),
            _ => None,
        });
        assert_eq!(resolved.base_url, "http://from-env");
        assert_eq!(resolved.token_file, PathBuf::from("/var/tmp/env-token.json"));
    }

    #[test]
    fn test_resolve_cli_base_url_wins() {
        let resolved = resolve_with_env(&ClientConfig::default(), Some("http://cli"), |_| {
            Some("http://from-env".to_string())
        });
        assert_eq!(resolved.base_url, "http://cli");
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = ClientConfig {
            logging: LoggingConfig {
                level: Some("chatty".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[api]
base_url = "https://rentals.example.com"
timeout_secs = 10

[session]
token_file = "alt-session.json"

[logging]
level = "info"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("https://rentals.example.com"));
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.session.token_file.as_deref(), Some("alt-session.json"));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[api]
timeout_secs = 3
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.timeout_secs, Some(3));
        assert!(config.api.base_url.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_load_config_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
