//! Evaluation output models.
//!
//! This module contains the derived tenure fields, the per-record evaluation
//! result, the data-quality issues raised while reading or evaluating
//! records, and the [`EvaluationReport`] that bundles them.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, EmployeeRecord};

/// Employment status as of the evaluation date.
///
/// # Example
///
/// ```
/// use gratuity_tracker::models::EmploymentStatus;
///
/// assert_eq!(EmploymentStatus::Exited.to_string(), "Exited");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    /// Still employed on the evaluation date (including future exit dates).
    Working,
    /// Left before the evaluation date.
    Exited,
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmploymentStatus::Working => f.write_str("Working"),
            EmploymentStatus::Exited => f.write_str("Exited"),
        }
    }
}

/// Fields computed from a record's dates; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Tenure in 365-day years, rounded to two decimal places.
    pub completed_years: Decimal,
    /// Employment status on the evaluation date.
    pub status: EmploymentStatus,
    /// Whether `completed_years` meets the gratuity threshold.
    pub gratuity_eligible: bool,
}

/// A record together with its derived fields.
///
/// `derived` is `None` when the record has no usable joining date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedRecord {
    /// The stored record.
    #[serde(flatten)]
    pub record: EmployeeRecord,
    /// The derived fields, if they could be computed.
    #[serde(flatten)]
    pub derived: Option<DerivedFields>,
}

impl EvaluatedRecord {
    /// Returns true if the record was evaluated and meets the threshold.
    pub fn is_eligible(&self) -> bool {
        self.derived.is_some_and(|derived| derived.gratuity_eligible)
    }
}

/// A problem with the input data that does not block processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityIssue {
    /// A data row had no employee id and was skipped.
    MissingId {
        /// 1-based data row number (header excluded).
        row: usize,
    },
    /// An id appeared more than once in one upload; later rows were folded in.
    DuplicateId {
        /// The repeated id.
        id: EmployeeId,
        /// 1-based data row number of the repeat.
        row: usize,
    },
    /// A date cell could not be parsed and was treated as missing.
    UnparseableDate {
        /// The employee the cell belongs to.
        id: EmployeeId,
        /// The column header.
        column: String,
        /// The raw cell text.
        value: String,
    },
    /// The record has no joining date, so no derived fields exist.
    MissingJoiningDate {
        /// The affected employee.
        id: EmployeeId,
    },
    /// Tenure came out negative (end date before joining date).
    ExitBeforeJoining {
        /// The affected employee.
        id: EmployeeId,
    },
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::MissingId { row } => write!(f, "row {row}: missing employee id"),
            DataQualityIssue::DuplicateId { id, row } => {
                write!(f, "row {row}: duplicate employee id '{id}'")
            }
            DataQualityIssue::UnparseableDate { id, column, value } => {
                write!(f, "employee '{id}': unparseable {column} '{value}'")
            }
            DataQualityIssue::MissingJoiningDate { id } => {
                write!(f, "employee '{id}': missing joining date")
            }
            DataQualityIssue::ExitBeforeJoining { id } => {
                write!(f, "employee '{id}': tenure ends before joining date")
            }
        }
    }
}

/// The result of evaluating a record set at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// The date tenure was measured against.
    pub evaluation_date: NaiveDate,
    /// The eligibility threshold in years.
    pub threshold_years: Decimal,
    /// Sorted distinct departments across the whole set.
    pub departments: Vec<String>,
    /// Evaluated records, in set order.
    pub rows: Vec<EvaluatedRecord>,
    /// Data-quality issues found during evaluation.
    pub issues: Vec<DataQualityIssue>,
}

impl EvaluationReport {
    /// Number of rows whose derived fields mark them eligible.
    pub fn eligible_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_eligible()).count()
    }
}
