//! HTTP request handlers for the Gratuity Tracker API.
//!
//! This module contains the handler functions for all API endpoints and the
//! basic-auth middleware that guards them.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Extension, Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{Credentials, Principal};
use crate::error::{TrackerError, TrackerResult};
use crate::export::template_csv;
use crate::ingest::UploadFormat;
use crate::notify::parse_recipient;

use super::request::{EmailRequest, ReportParams, ReportQuery, UploadQuery};
use super::response::{ApiErrorResponse, EmailSent};
use super::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const TEMPLATE_FILE_NAME: &str = "employee_template.csv";
const EXPORT_FILE_NAME: &str = "filtered_report.csv";
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Creates the API router with all endpoints.
///
/// When the state carries an authenticator, every route requires HTTP basic
/// credentials.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/template", get(template_handler))
        .route("/records", post(upload_handler).get(records_handler))
        .route("/records/export", get(export_handler))
        .route("/reports/email", post(email_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Rejects requests without valid credentials when authentication is enabled.
async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(authenticator) = state.authenticator() else {
        return next.run(request).await;
    };

    let result = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => {
            Credentials::from_basic_header(value).and_then(|c| authenticator.authenticate(&c))
        }
        None => Err(TrackerError::AuthenticationFailed {
            message: "missing Authorization header".to_string(),
        }),
    };

    match result {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            warn!(path = %request.uri().path(), error = %err, "Rejected unauthenticated request");
            let mut response = ApiErrorResponse::from(err).into_response();
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"gratuity-tracker\""),
            );
            response
        }
    }
}

/// Runs blocking tracker work off the async runtime, logging failures.
async fn run_blocking<T, F>(
    correlation_id: Uuid,
    operation: &'static str,
    work: F,
) -> Result<T, ApiErrorResponse>
where
    T: Send + 'static,
    F: FnOnce() -> TrackerResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            Err(err.into())
        }
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %join_error,
                "Background task failed"
            );
            Err(ApiErrorResponse::internal(join_error.to_string()))
        }
    }
}

fn csv_response(file_name: &str, body: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

/// The authenticated username for logs; `anonymous` when auth is disabled.
fn username(principal: &Option<Extension<Principal>>) -> &str {
    principal
        .as_ref()
        .map_or("anonymous", |Extension(principal)| principal.username.as_str())
}

fn query_params(
    correlation_id: Uuid,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<ReportParams, ApiErrorResponse> {
    let Query(query) = query.map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiErrorResponse::bad_request(rejection.body_text())
    })?;
    query.params().map_err(ApiErrorResponse::from)
}

/// Handler for GET /template.
async fn template_handler() -> Result<Response, ApiErrorResponse> {
    let body = template_csv()?;
    Ok(csv_response(TEMPLATE_FILE_NAME, body))
}

/// Handler for POST /records.
///
/// The body is the raw file. The format is taken from the ZIP signature,
/// then the `filename` query parameter's extension, then the `Content-Type`
/// header; anything else is read as CSV.
async fn upload_handler(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiErrorResponse::bad_request(rejection.body_text())
    })?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let format = UploadFormat::detect(query.filename.as_deref(), content_type, &body);
    info!(
        correlation_id = %correlation_id,
        user = %username(&principal),
        filename = query.filename.as_deref().unwrap_or(""),
        format = ?format,
        bytes = body.len(),
        "Processing upload"
    );

    let start_time = Instant::now();
    let tracker = state.tracker().clone();
    let outcome = run_blocking(correlation_id, "upload", move || {
        tracker.ingest(&body, format)
    })
    .await?;

    info!(
        correlation_id = %correlation_id,
        inserted = outcome.inserted.len(),
        updated = outcome.updated.len(),
        total = outcome.total,
        issues = outcome.issues.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Upload merged"
    );
    Ok((StatusCode::OK, Json(outcome)).into_response())
}

/// Handler for GET /records.
async fn records_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let params = query_params(correlation_id, query)?;

    let tracker = state.tracker().clone();
    let report = run_blocking(correlation_id, "list", move || {
        tracker.report(params.evaluation_date, params.threshold, &params.filter)
    })
    .await?;

    info!(
        correlation_id = %correlation_id,
        evaluation_date = %report.evaluation_date,
        rows = report.rows.len(),
        eligible = report.eligible_count(),
        "Records evaluated"
    );
    Ok((StatusCode::OK, Json(report)).into_response())
}

/// Handler for GET /records/export.
async fn export_handler(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let params = query_params(correlation_id, query)?;

    let tracker = state.tracker().clone();
    let body = run_blocking(correlation_id, "export", move || {
        tracker.export_csv(params.evaluation_date, params.threshold, &params.filter)
    })
    .await?;

    info!(correlation_id = %correlation_id, bytes = body.len(), "Report exported");
    Ok(csv_response(EXPORT_FILE_NAME, body))
}

/// Handler for POST /reports/email.
///
/// Sends the filtered CSV once. A relay failure is returned as 502 and never
/// retried.
async fn email_handler(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid email request");
        ApiErrorResponse::bad_request(rejection.body_text())
    })?;
    parse_recipient(&request.recipient)?;
    let params = request.params()?;

    let Some((mailer, mail_config)) = state.mail() else {
        warn!(correlation_id = %correlation_id, "Report email requested but mail is not configured");
        return Err(TrackerError::MailNotConfigured.into());
    };
    let (mailer, mail_config) = (mailer.clone(), mail_config.clone());

    info!(
        correlation_id = %correlation_id,
        user = %username(&principal),
        recipient = %request.recipient,
        "Sending report email"
    );

    let tracker = state.tracker().clone();
    let recipient = request.recipient.clone();
    run_blocking(correlation_id, "email", move || {
        let email = tracker.report_email(
            &mail_config,
            &recipient,
            params.evaluation_date,
            params.threshold,
            &params.filter,
        )?;
        mailer.send(&email)
    })
    .await?;

    info!(correlation_id = %correlation_id, "Report email sent");
    Ok((
        StatusCode::OK,
        Json(EmailSent {
            sent: true,
            recipient: request.recipient.trim().to_string(),
        }),
    )
        .into_response())
}
