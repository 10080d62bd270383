//! Service configuration for fare-predict.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Invalid allowed origin '{0}': expected an http(s) origin without a path")]
    Origin(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

pub const BIND_ADDR_VAR: &str = "FARE_BIND_ADDR";
pub const MODEL_PATH_VAR: &str = "FARE_MODEL_PATH";
pub const SCALER_PATH_VAR: &str = "FARE_SCALER_PATH";
pub const ALLOWED_ORIGIN_VAR: &str = "FARE_ALLOWED_ORIGIN";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MODEL_PATH: &str = "model.json";
const DEFAULT_SCALER_PATH: &str = "scaler.json";
const DEFAULT_ALLOWED_ORIGIN: &str = "https://flight-fare-prediction-coral.vercel.app";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    /// The single origin allowed to make cross-origin requests.
    pub allowed_origin: String,
}

impl ServiceConfig {
    /// Reads configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Unset or blank keys
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_value = get(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::BindAddr { value: bind_value.clone(), source })?;

        let allowed_origin = get(ALLOWED_ORIGIN_VAR, DEFAULT_ALLOWED_ORIGIN);
        validate_origin(&allowed_origin)?;

        Ok(Self {
            bind_addr,
            model_path: PathBuf::from(get(MODEL_PATH_VAR, DEFAULT_MODEL_PATH)),
            scaler_path: PathBuf::from(get(SCALER_PATH_VAR, DEFAULT_SCALER_PATH)),
            allowed_origin,
        })
    }
}

/// Browsers send `Origin` as scheme://host[:port], so anything else would
/// never match.
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::Origin(origin.to_string()))?;

    let valid = !rest.is_empty()
        && !rest.contains('/')
        && rest.chars().all(|c| c.is_ascii_graphic());
    if !valid {
        return Err(ConfigError::Origin(origin.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.scaler_path, PathBuf::from("scaler.json"));
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "127.0.0.1:9090"),
            (MODEL_PATH_VAR, "/srv/artifacts/model.json"),
            (SCALER_PATH_VAR, "/srv/artifacts/scaler.json"),
            (ALLOWED_ORIGIN_VAR, "http://localhost:5173"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.model_path, PathBuf::from("/srv/artifacts/model.json"));
        assert_eq!(config.allowed_origin, "http://localhost:5173");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[(MODEL_PATH_VAR, "  ")])).unwrap();
        assert_eq!(config.model_path, PathBuf::from("model.json"));
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = ServiceConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::BindAddr { .. }));
    }

    #[test]
    fn test_invalid_origins() {
        for origin in ["ftp://example.com", "https://", "https://example.com/app", "example.com"] {
            let err = ServiceConfig::from_lookup(lookup(&[(ALLOWED_ORIGIN_VAR, origin)])).unwrap_err();
            assert!(matches!(err, ConfigError::Origin(_)), "{origin} accepted");
        }
    }
}
