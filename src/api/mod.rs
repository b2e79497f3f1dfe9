//! HTTP API module for the Gratuity Tracker.
//!
//! This module provides the REST endpoints for downloading the upload
//! template, uploading and merging records, viewing and exporting the
//! evaluated records, and emailing a filtered report.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmailRequest, ReportParams, ReportQuery, UploadQuery};
pub use response::{ApiError, ApiErrorResponse, EmailSent};
pub use state::AppState;
