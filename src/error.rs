//! Error types for the Gratuity Tracker.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while ingesting, reconciling,
//! storing and reporting employee records.

use thiserror::Error;

/// The main error type for the Gratuity Tracker.
///
/// All fallible operations in the crate return this error type, so callers
/// (and the HTTP layer) can map failures consistently.
///
/// # Example
///
/// ```
/// use gratuity_tracker::error::TrackerError;
///
/// let error = TrackerError::ConfigNotFound {
///     path: "/missing/tracker.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tracker.yaml");
/// ```
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was present but not usable.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The uploaded file could not be read as a table at all.
    #[error("Malformed upload: {message}")]
    MalformedUpload {
        /// A description of what went wrong.
        message: String,
    },

    /// The uploaded table lacks one or more required columns.
    #[error("Upload is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// The required column headers that were not found.
        columns: Vec<String>,
    },

    /// Derived fields were requested for a record without a joining date.
    #[error("Employee '{id}' has no joining date")]
    MissingJoiningDate {
        /// The employee identifier.
        id: String,
    },

    /// Writing an export could not be completed.
    #[error("Export failed: {message}")]
    Export {
        /// A description of the failure.
        message: String,
    },

    /// Reading or writing the persisted record set failed.
    #[error("Record store error at '{path}': {message}")]
    Storage {
        /// The store location.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Composing or delivering a report email failed.
    #[error("Mail delivery failed: {message}")]
    Mail {
        /// The error reported by the mail relay or message builder.
        message: String,
    },

    /// Mail delivery was requested but no relay is configured.
    #[error("Mail delivery is not configured")]
    MailNotConfigured,

    /// Credentials were missing or did not match a known principal.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Why the credentials were rejected.
        message: String,
    },

    /// A request parameter was invalid.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return TrackerError.
pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = TrackerError::ConfigNotFound {
            path: "/missing/tracker.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/tracker.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = TrackerError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_missing_columns_lists_every_column() {
        let error = TrackerError::MissingColumns {
            columns: vec!["Joining Date".to_string(), "Exit Date".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Upload is missing required columns: Joining Date, Exit Date"
        );
    }

    #[test]
    fn test_missing_joining_date_displays_id() {
        let error = TrackerError::MissingJoiningDate {
            id: "E042".to_string(),
        };
        assert_eq!(error.to_string(), "Employee 'E042' has no joining date");
    }

    #[test]
    fn test_storage_error_displays_path_and_message() {
        let error = TrackerError::Storage {
            path: "./data/employees.xlsx".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Record store error at './data/employees.xlsx': permission denied"
        );
    }

    #[test]
    fn test_mail_errors_display() {
        let error = TrackerError::Mail {
            message: "535 authentication rejected".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Mail delivery failed: 535 authentication rejected"
        );
        assert_eq!(
            TrackerError::MailNotConfigured.to_string(),
            "Mail delivery is not configured"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<TrackerError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_malformed() -> TrackerResult<()> {
            Err(TrackerError::MalformedUpload {
                message: "empty file".to_string(),
            })
        }

        fn propagates_error() -> TrackerResult<()> {
            returns_malformed()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
