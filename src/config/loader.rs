//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tracker
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{TrackerError, TrackerResult};

use super::types::{MailConfig, TrackerConfig, UserConfig, UsersConfig};

/// Loads and provides access to tracker configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── tracker.yaml   # Threshold, store path, listener, mail relay
/// ├── users.yaml     # Optional: API users (SHA-256 password digests)
/// └── users.yaml.example
/// ```
///
/// # Example
///
/// ```no_run
/// use gratuity_tracker::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Gratuity threshold: {} years", loader.threshold());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: TrackerConfig,
    users: Vec<UserConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `tracker.yaml` is missing or contains invalid YAML
    /// - `users.yaml` exists but contains invalid YAML
    /// - A value fails validation (negative threshold, malformed digest)
    pub fn load<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<TrackerConfig>(&path.join("tracker.yaml"))?;

        let users_path = path.join("users.yaml");
        let users = if users_path.exists() {
            Self::load_yaml::<UsersConfig>(&users_path)?.users
        } else {
            Vec::new()
        };

        Self::from_parts(config, users)
    }

    /// Builds a loader from already-parsed parts, applying the same validation.
    pub fn from_parts(config: TrackerConfig, users: Vec<UserConfig>) -> TrackerResult<Self> {
        if config.gratuity.threshold_years < Decimal::ZERO {
            return Err(TrackerError::InvalidConfig {
                field: "gratuity.threshold_years".to_string(),
                message: "must not be negative".to_string(),
            });
        }

        if config.server.bind.trim().is_empty() {
            return Err(TrackerError::InvalidConfig {
                field: "server.bind".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        for user in &users {
            let digest = &user.password_sha256;
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(TrackerError::InvalidConfig {
                    field: format!("users.{}.password_sha256", user.username),
                    message: "must be a 64-character hex SHA-256 digest".to_string(),
                });
            }
        }

        Ok(Self { config, users })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> TrackerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| TrackerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| TrackerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the configured gratuity threshold in years.
    pub fn threshold(&self) -> Decimal {
        self.config.gratuity.threshold_years
    }

    /// Returns the record store path.
    pub fn store_path(&self) -> &Path {
        &self.config.store.path
    }

    /// Returns the listener address.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind
    }

    /// Returns the mail relay settings, if report emails are enabled.
    pub fn mail(&self) -> Option<&MailConfig> {
        self.config.mail.as_ref()
    }

    /// Returns the configured API users.
    pub fn users(&self) -> &[UserConfig] {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GratuityConfig;

    fn config_path() -> &'static str {
        "./config"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.threshold(), Decimal::new(5, 0));
        assert_eq!(loader.store_path(), Path::new("./data/employees.xlsx"));
        assert_eq!(loader.bind_address(), "127.0.0.1:8080");
        assert_eq!(loader.mail().map(|m| m.port), Some(465));
        assert!(loader.users().is_empty(), "no users file ships enabled");
    }

    #[test]
    fn test_example_users_file_is_valid() {
        let users = ConfigLoader::load_yaml::<UsersConfig>(Path::new("./config/users.yaml.example"))
            .unwrap()
            .users;
        let loader = ConfigLoader::from_parts(TrackerConfig::default(), users).unwrap();

        assert_eq!(loader.users().len(), 1);
        assert_eq!(loader.users()[0].username, "operator");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(TrackerError::ConfigNotFound { path }) => {
                assert!(path.contains("tracker.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = TrackerConfig {
            gratuity: GratuityConfig {
                threshold_years: Decimal::new(-1, 0),
            },
            ..TrackerConfig::default()
        };

        match ConfigLoader::from_parts(config, Vec::new()) {
            Err(TrackerError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "gratuity.threshold_years");
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_malformed_digest_rejected() {
        let users = vec![UserConfig {
            username: "operator".to_string(),
            password_sha256: "not-a-digest".to_string(),
        }];

        let result = ConfigLoader::from_parts(TrackerConfig::default(), users);
        assert!(matches!(result, Err(TrackerError::InvalidConfig { .. })));
    }

    #[test]
    fn test_default_loader() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.threshold(), Decimal::new(5, 0));
        assert!(loader.mail().is_none());
        assert!(loader.users().is_empty());
    }
}
