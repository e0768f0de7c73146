//! Configuration module for List Motions.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `LIST_MOTIONS_STATUS_LABEL` | No | `List Count` | Label in front of the item count |
//! | `LIST_MOTIONS_DEBOUNCE_MS` | No | 100 | Quiet period before a changed file is recounted |
//! | `LIST_MOTIONS_BUFFER_SIZE` | No | 256 | Watch event channel capacity |
//! | `LIST_MOTIONS_EXTENSIONS` | No | `md,markdown` | Comma-separated extensions to watch |
//!
//! # Example
//!
//! ```no_run
//! use list_motions::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Label: {}", config.status_label);
//! ```

use std::env;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::utils::DEFAULT_DEBOUNCE_MS;

/// Default status text label.
pub const DEFAULT_STATUS_LABEL: &str = "List Count";

/// Default watch event channel capacity.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Default extensions treated as markdown documents.
const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for List Motions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Label rendered before the count, as in `List Count: 3`.
    pub status_label: String,

    /// How long a file must stay quiet before it is recounted.
    pub debounce: Duration,

    /// Capacity of the watch event channel.
    pub buffer_size: usize,

    /// File extensions (without dot, lowercase) treated as documents.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_label: DEFAULT_STATUS_LABEL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            buffer_size: DEFAULT_BUFFER_SIZE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a numeric variable is not a positive
    /// integer or if the extension allowlist ends up empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let status_label = env::var("LIST_MOTIONS_STATUS_LABEL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.status_label);

        let debounce = match env::var("LIST_MOTIONS_DEBOUNCE_MS") {
            Ok(val) => Duration::from_millis(parse_positive("LIST_MOTIONS_DEBOUNCE_MS", &val)?),
            Err(_) => defaults.debounce,
        };

        let buffer_size = match env::var("LIST_MOTIONS_BUFFER_SIZE") {
            Ok(val) => parse_positive("LIST_MOTIONS_BUFFER_SIZE", &val)? as usize,
            Err(_) => defaults.buffer_size,
        };

        let extensions = match env::var("LIST_MOTIONS_EXTENSIONS") {
            Ok(val) => {
                let list: Vec<String> = val
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if list.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "LIST_MOTIONS_EXTENSIONS".to_string(),
                        message: "at least one extension is required".to_string(),
                    });
                }
                list
            }
            Err(_) => defaults.extensions,
        };

        Ok(Self {
            status_label,
            debounce,
            buffer_size,
            extensions,
        })
    }

    /// Whether `path` has one of the configured document extensions.
    #[must_use]
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }
}

/// Parses a strictly positive integer for `key`.
fn parse_positive(key: &str, val: &str) -> Result<u64, ConfigError> {
    let n = val
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected positive integer, got '{val}'"),
        })?;
    if n == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "value must be greater than 0".to_string(),
        });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::path::PathBuf;

    /// Helper to run tests with isolated environment variables.
    /// Clears all LIST_MOTIONS_* vars before the test and restores them after.
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let saved_vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with("LIST_MOTIONS_"))
            .collect();

        for (key, _) in &saved_vars {
            env::remove_var(key);
        }

        let result = f();

        for (key, _) in env::vars().filter(|(k, _)| k.starts_with("LIST_MOTIONS_")) {
            env::remove_var(key);
        }
        for (key, value) in saved_vars {
            env::set_var(key, value);
        }

        result
    }

    #[test]
    #[serial]
    fn test_defaults() {
        with_clean_env(|| {
            let config = Config::from_env().expect("should parse empty env");
            assert_eq!(config, Config::default());
            assert_eq!(config.status_label, "List Count");
            assert_eq!(config.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));
        });
    }

    #[test]
    #[serial]
    fn test_full_config() {
        with_clean_env(|| {
            env::set_var("LIST_MOTIONS_STATUS_LABEL", "Tasks");
            env::set_var("LIST_MOTIONS_DEBOUNCE_MS", "250");
            env::set_var("LIST_MOTIONS_BUFFER_SIZE", "16");
            env::set_var("LIST_MOTIONS_EXTENSIONS", " md , .TXT ,, ");

            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.status_label, "Tasks");
            assert_eq!(config.debounce, Duration::from_millis(250));
            assert_eq!(config.buffer_size, 16);
            assert_eq!(config.extensions, vec!["md".to_string(), "txt".to_string()]);
        });
    }

    #[test]
    #[serial]
    fn test_zero_debounce_rejected() {
        with_clean_env(|| {
            env::set_var("LIST_MOTIONS_DEBOUNCE_MS", "0");

            let err = Config::from_env().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref message }
                    if key == "LIST_MOTIONS_DEBOUNCE_MS" && message.contains("greater than 0")
            ));
        });
    }

    #[test]
    #[serial]
    fn test_invalid_buffer_size() {
        with_clean_env(|| {
            env::set_var("LIST_MOTIONS_BUFFER_SIZE", "lots");

            let err = Config::from_env().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, .. } if key == "LIST_MOTIONS_BUFFER_SIZE"
            ));
        });
    }

    #[test]
    #[serial]
    fn test_empty_extension_list_rejected() {
        with_clean_env(|| {
            env::set_var("LIST_MOTIONS_EXTENSIONS", " , ,");
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_is_document() {
        let config = Config::default();
        assert!(config.is_document(&PathBuf::from("/notes/todo.md")));
        assert!(config.is_document(&PathBuf::from("README.MD")));
        assert!(config.is_document(&PathBuf::from("a.markdown")));
        assert!(!config.is_document(&PathBuf::from("a.txt")));
        assert!(!config.is_document(&PathBuf::from("Makefile")));
    }
}
