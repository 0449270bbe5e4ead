//! OAuth client configuration.
//!
//! Stored in TOML at `~/.config/ga-audit/config.toml` (or XDG equivalent):
//!
//! ```toml
//! [oauth]
//! client_id = "1234.apps.googleusercontent.com"
//! client_secret = "..."
//! redirect_uri = "http://localhost:8501"
//! ```
//!
//! Only the `login` flow needs this file; `audit` and `properties` work
//! from a bearer token alone (`--token` / `GA_AUDIT_TOKEN`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("no config file at {0}; create one or pass --config")]
    Missing(PathBuf),
}

fn default_redirect_uri() -> String {
    "http://localhost:8501".to_string()
}

/// OAuth2 client credentials for the authorization-code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

/// Root configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub oauth: OauthConfig,
}

impl Config {
    /// Default config path under the platform config directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("ga-audit").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from an explicit path, or the default location.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };
        if !path.exists() {
            return Err(ConfigError::Missing(path));
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let raw = r#"
            [oauth]
            client_id = "id-1"
            client_secret = "s3cret"
        "#;
        let config: Config = toml::from_str(raw).expect("parse");
        assert_eq!(config.oauth.client_id, "id-1");
        assert_eq!(config.oauth.redirect_uri, "http://localhost:8501");
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid").expect("write");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
