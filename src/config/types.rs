//! Configuration types for the Gratuity Tracker.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::DEFAULT_GRATUITY_THRESHOLD;

/// Eligibility rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GratuityConfig {
    /// Minimum completed years for gratuity eligibility.
    #[serde(default = "default_threshold")]
    pub threshold_years: Decimal,
}

fn default_threshold() -> Decimal {
    DEFAULT_GRATUITY_THRESHOLD
}

impl Default for GratuityConfig {
    fn default() -> Self {
        Self {
            threshold_years: DEFAULT_GRATUITY_THRESHOLD,
        }
    }
}

/// Where the merged record set is persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreConfig {
    /// Path of the spreadsheet file holding the latest merged set.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/employees.xlsx"),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8080`.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Mail relay settings.
///
/// Credentials are never stored here: `username_env` and `password_env`
/// name the environment variables that hold them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MailConfig {
    /// Relay host; the connection uses implicit TLS.
    #[serde(default = "default_relay")]
    pub relay: String,
    /// Relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Environment variable holding the relay username.
    #[serde(default = "default_username_env")]
    pub username_env: String,
    /// Environment variable holding the relay password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
    /// From address; defaults to the relay username.
    #[serde(default)]
    pub sender: Option<String>,
    /// Subject line of report emails.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Plain-text body of report emails.
    #[serde(default = "default_body")]
    pub body: String,
    /// File name of the attached CSV.
    #[serde(default = "default_attachment_name")]
    pub attachment_name: String,
}

fn default_relay() -> String {
    "smtp.gmail.com".to_string()
}

fn default_port() -> u16 {
    465
}

fn default_username_env() -> String {
    "GMAIL_USER".to_string()
}

fn default_password_env() -> String {
    "GMAIL_PASS".to_string()
}

fn default_subject() -> String {
    "Gratuity Report".to_string()
}

fn default_body() -> String {
    "Attached is the filtered gratuity report as per your request.".to_string()
}

fn default_attachment_name() -> String {
    "filtered_report.csv".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay: default_relay(),
            port: default_port(),
            username_env: default_username_env(),
            password_env: default_password_env(),
            sender: None,
            subject: default_subject(),
            body: default_body(),
            attachment_name: default_attachment_name(),
        }
    }
}

/// Settings from tracker.yaml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackerConfig {
    /// Eligibility rules.
    #[serde(default)]
    pub gratuity: GratuityConfig,
    /// Record store location.
    #[serde(default)]
    pub store: StoreConfig,
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail relay; report emails are disabled when absent.
    #[serde(default)]
    pub mail: Option<MailConfig>,
}

/// A user allowed to call the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserConfig {
    /// Login name.
    pub username: String,
    /// Lowercase hex SHA-256 digest of the password.
    pub password_sha256: String,
}

/// Users file structure (users.yaml).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UsersConfig {
    /// Known users.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}
