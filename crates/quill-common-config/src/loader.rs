//! Configuration file loading and parsing.

use crate::env::{vars, Environment};
use crate::types::QuillConfig;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

const CONFIG_DIR: &str = ".quill";
const CONFIG_FILE: &str = "config.yaml";

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
    })
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// Create a loader for `<project_dir>/.quill/config.yaml`.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE),
            required: false,
        }
    }

    /// Create a loader for an explicit file, which must exist.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            required: true,
        }
    }

    /// Load `.env` files, then honor `QUILL_CONFIG_PATH`, falling back to
    /// the current directory.
    pub fn from_env() -> Self {
        let _env = Environment::init();
        match Environment::get(vars::QUILL_CONFIG_PATH) {
            Some(path) => Self::from_file(path),
            None => Self::default(),
        }
    }

    /// Path the loader reads from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration, returning defaults when an optional file is absent.
    pub fn load(&self) -> Result<QuillConfig, ConfigError> {
        if !self.config_path.exists() {
            if self.required {
                return Err(ConfigError::NotFound {
                    path: self.config_path.clone(),
                });
            }
            return Ok(QuillConfig::default());
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let config = Self::parse(&contents)?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<QuillConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        let config: QuillConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, config: &QuillConfig) -> Result<(), ConfigError> {
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&self.config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    expand_vars(content, |name| std::env::var(name).ok())
}

fn expand_vars(
    content: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in env_var_pattern().captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match lookup(var_name) {
            Some(v) => v,
            None => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Validate configuration values.
fn validate(config: &QuillConfig) -> Result<(), ConfigError> {
    if config.content.summary_length == 0 {
        return Err(ConfigError::ValidationError {
            message: "content.summary_length must be greater than 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) {
        let quill_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&quill_dir).unwrap();
        fs::write(quill_dir.join(CONFIG_FILE), contents).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config, QuillConfig::default());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(loader.load(), Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
security:
  log_granted: true
content:
  summary_length: 80
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert!(config.security.log_granted);
        assert_eq!(config.content.summary_length, 80);
        // unspecified values keep defaults
        assert!(config.security.audit_decisions);
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${QUILL_TEST_NONEXISTENT:-fallback}").unwrap();
        assert_eq!(result, "key: fallback");
    }

    #[test]
    fn test_env_var_expansion() {
        let yaml = expand_vars("content:\n  summary_length: ${QUILL_SUMMARY}\n", |name| {
            (name == "QUILL_SUMMARY").then(|| "64".to_string())
        })
        .unwrap();
        let config = ConfigLoader::parse(&yaml).unwrap();
        assert_eq!(config.content.summary_length, 64);
    }

    #[test]
    fn test_set_variable_wins_over_default() {
        let result = expand_vars("a: ${QUILL_A:-x}, b: ${QUILL_B:-y}", |name| {
            (name == "QUILL_A").then(|| "set".to_string())
        })
        .unwrap();
        assert_eq!(result, "a: set, b: y");
    }

    #[test]
    fn test_from_env_path() {
        let loader = ConfigLoader::from_env();
        match std::env::var(vars::QUILL_CONFIG_PATH) {
            Ok(path) => assert_eq!(loader.path(), Path::new(&path)),
            Err(_) => assert!(loader.path().ends_with(".quill/config.yaml")),
        }
    }

    #[test]
    fn test_env_var_missing_error() {
        match expand_env_vars("key: ${QUILL_TEST_MISSING_VAR}") {
            Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "QUILL_TEST_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_summary_length_rejected() {
        let result = ConfigLoader::parse("content:\n  summary_length: 0\n");
        match result {
            Err(ConfigError::ValidationError { message }) => {
                assert!(message.contains("summary_length"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let result = ConfigLoader::parse("security:\n  audit_decisions: [unclosed\n");
        match result {
            Err(ConfigError::ParseError { line, .. }) => assert!(line.is_some()),
            other => panic!("Expected ParseError with line number, got {:?}", other),
        }
    }

    #[test]
    fn test_save_config() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());

        let mut config = QuillConfig::default();
        config.security.audit_decisions = false;
        config.content.summary_length = 12;
        loader.save(&config).unwrap();

        assert!(loader.path().exists());
        assert_eq!(loader.load().unwrap(), config);
    }
}
