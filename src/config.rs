use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PROJECT_ID: &str = "travelgram";
pub const DEFAULT_MODEL_PATH: &str = "models/travelgram_classifier.onnx";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    pub firebase_project_id: String,
    pub id_token_secret: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub model_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database_url: optional("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            redis_url: optional("REDIS_URL"),
            firebase_project_id: optional("FIREBASE_PROJECT_ID").unwrap_or_else(|| {
                info!("FIREBASE_PROJECT_ID not set, using default: {DEFAULT_PROJECT_ID}");
                DEFAULT_PROJECT_ID.to_string()
            }),
            id_token_secret: optional("ID_TOKEN_SECRET")
                .ok_or(ConfigError::Missing("ID_TOKEN_SECRET"))?,
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            model_path: optional("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
        })
    }
}

/// Tracing filter directives from `RUST_LOG`, `info` when unset
pub fn log_filter() -> String {
    log_filter_from(|key| env::var(key).ok())
}

pub fn log_filter_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUST_LOG")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/travelgram"),
            ("ID_TOKEN_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.firebase_project_id, DEFAULT_PROJECT_ID);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.redis_url.is_none());
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_missing_required_variables() {
        let err = AppConfig::from_lookup(lookup_from(&[("ID_TOKEN_SECRET", "secret")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("ID_TOKEN_SECRET"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("ID_TOKEN_SECRET", "secret"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_blank_optional_values_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("ID_TOKEN_SECRET", "secret"),
            ("REDIS_URL", "  "),
            ("GEMINI_API_KEY", ""),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.redis_url.is_none());
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter_from(lookup_from(&[])), DEFAULT_LOG_FILTER);
        assert_eq!(log_filter_from(lookup_from(&[("RUST_LOG", " ")])), "info");
    }

    #[test]
    fn test_log_filter_reads_rust_log() {
        assert_eq!(
            log_filter_from(lookup_from(&[("RUST_LOG", "travelgram_backend=debug,tower_http=info")])),
            "travelgram_backend=debug,tower_http=info"
        );
    }
}
