//! Environment variable handling.

use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const QUILL_CONFIG_PATH: &str = "QUILL_CONFIG_PATH";
    pub const QUILL_ENV: &str = "QUILL_ENV";

    // Logging
    pub const QUILL_LOG_LEVEL: &str = "QUILL_LOG_LEVEL";
    pub const QUILL_LOG_FORMAT: &str = "QUILL_LOG_FORMAT";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from .env files.
    pub fn init() -> Self {
        // Variables already set are never replaced, so the most specific
        // file loads first. Missing files are fine.
        if let Ok(name) = env::var(vars::QUILL_ENV) {
            let _ = dotenvy::from_filename(format!(".env.{}", name));
        }
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        Self { _guard: () }
    }

    /// Get a required string variable.
    pub fn require(var: &str) -> Result<String, EnvError> {
        env::var(var).map_err(|_| EnvError::NotSet { var: var.to_string() })
    }

    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        env::var(var).unwrap_or_else(|_| default.to_string())
    }

    /// Get a boolean variable.
    pub fn get_bool(var: &str) -> Option<bool> {
        env::var(var).ok().map(|v| parse_bool(&v))
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        env::var(var).ok().map(|v| parse_int(var, &v)).transpose()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_int<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, EnvError> {
    value.parse().map_err(|_| EnvError::InvalidValue {
        var: var.to_string(),
        message: "expected integer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing() {
        let err = Environment::require("QUILL_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(matches!(err, EnvError::NotSet { var } if var == "QUILL_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("Yes"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int::<u32>("QUILL_X", "17").unwrap(), 17);
        let err = parse_int::<u32>("QUILL_X", "seventeen").unwrap_err();
        assert!(matches!(err, EnvError::InvalidValue { var, .. } if var == "QUILL_X"));
    }

    #[test]
    fn test_unset_typed_getters() {
        assert_eq!(Environment::get_bool("QUILL_TEST_UNSET_BOOL"), None);
        assert!(matches!(Environment::get_int::<u32>("QUILL_TEST_UNSET_INT"), Ok(None)));
    }

    #[test]
    fn test_get_or_default() {
        assert_eq!(Environment::get_or("QUILL_TEST_UNSET_GET_OR", "x"), "x");
    }
}
