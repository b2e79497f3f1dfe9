//! Configuration loading and management for the Gratuity Tracker.
//!
//! This module provides functionality to load tracker settings from YAML
//! files: the eligibility threshold, the record store location, the HTTP
//! listener, the mail relay and the API users.
//!
//! # Example
//!
//! ```no_run
//! use gratuity_tracker::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Records stored at: {}", config.store_path().display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    GratuityConfig, MailConfig, ServerConfig, StoreConfig, TrackerConfig, UserConfig, UsersConfig,
};
