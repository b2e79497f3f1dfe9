//! Request types for the Gratuity Tracker API.
//!
//! The record listing and CSV export take their parameters from the query
//! string ([`ReportQuery`]); the email endpoint takes a JSON body
//! ([`EmailRequest`]). Both normalise into [`ReportParams`].

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::RecordFilter;
use crate::error::{TrackerError, TrackerResult};

/// Query string for `GET /records` and `GET /records/export`.
///
/// `departments` is a comma-separated list. `eligible_only` defaults to
/// `true`, matching the dashboard's initial view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Evaluation date; defaults to today (local time).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Overrides the configured threshold, in years.
    #[serde(default)]
    pub threshold: Option<Decimal>,
    /// Comma-separated departments to keep.
    #[serde(default)]
    pub departments: Option<String>,
    /// Keep only eligible records.
    #[serde(default)]
    pub eligible_only: Option<bool>,
}

impl ReportQuery {
    /// Validates and normalises the query.
    pub fn params(&self) -> TrackerResult<ReportParams> {
        let departments = self.departments.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        ReportParams::new(self.as_of, self.threshold, departments, self.eligible_only)
    }
}

/// Query string for `POST /records`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadQuery {
    /// Name of the uploaded file; its extension selects CSV or XLSX.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Body of `POST /reports/email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRequest {
    /// Destination address.
    pub recipient: String,
    /// Evaluation date; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Overrides the configured threshold.
    #[serde(default)]
    pub threshold: Option<Decimal>,
    /// Departments to keep.
    #[serde(default)]
    pub departments: Option<Vec<String>>,
    /// Keep only eligible records; defaults to `true`.
    #[serde(default)]
    pub eligible_only: Option<bool>,
}

impl EmailRequest {
    /// Validates and normalises the report parameters.
    pub fn params(&self) -> TrackerResult<ReportParams> {
        ReportParams::new(
            self.as_of,
            self.threshold,
            self.departments.clone(),
            self.eligible_only,
        )
    }
}

/// Validated report parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportParams {
    /// Date tenure is measured against.
    pub evaluation_date: NaiveDate,
    /// Threshold override, if any.
    pub threshold: Option<Decimal>,
    /// Row filter.
    pub filter: RecordFilter,
}

impl ReportParams {
    fn new(
        as_of: Option<NaiveDate>,
        threshold: Option<Decimal>,
        departments: Option<Vec<String>>,
        eligible_only: Option<bool>,
    ) -> TrackerResult<Self> {
        if threshold.is_some_and(|t| t < Decimal::ZERO) {
            return Err(TrackerError::InvalidRequest {
                field: "threshold".to_string(),
                message: "must not be negative".to_string(),
            });
        }

        // An empty selection means "all departments".
        let departments = departments.filter(|list| !list.is_empty());

        Ok(Self {
            evaluation_date: as_of.unwrap_or_else(|| Local::now().date_naive()),
            threshold,
            filter: RecordFilter {
                departments,
                eligible_only: eligible_only.unwrap_or(true),
            },
        })
    }
}
