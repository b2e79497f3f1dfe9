//! Evaluation of a whole record set.
//!
//! Runs [`compute_derived`] over every record and turns per-record failures
//! into data-quality issues instead of failing the batch.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{DataQualityIssue, EvaluatedRecord, EvaluationReport, RecordSet};

use super::eligibility::compute_derived;

/// Evaluates every record in `records` as of `evaluation_date`.
///
/// Records without a joining date are kept with no derived fields and
/// reported as [`DataQualityIssue::MissingJoiningDate`]. Negative tenures are
/// kept as computed and reported as [`DataQualityIssue::ExitBeforeJoining`].
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::{evaluate, DEFAULT_GRATUITY_THRESHOLD};
/// use gratuity_tracker::models::{EmployeeId, EmployeeRecord, RecordSet};
/// use chrono::NaiveDate;
///
/// let mut record = EmployeeRecord::new(EmployeeId::parse("E001").unwrap());
/// record.joining_date = NaiveDate::from_ymd_opt(2015, 6, 1);
/// let records: RecordSet = vec![record].into_iter().collect();
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let report = evaluate(&records, today, DEFAULT_GRATUITY_THRESHOLD);
/// assert_eq!(report.eligible_count(), 1);
/// assert!(report.issues.is_empty());
/// ```
pub fn evaluate(
    records: &RecordSet,
    evaluation_date: NaiveDate,
    threshold: Decimal,
) -> EvaluationReport {
    let mut rows = Vec::with_capacity(records.len());
    let mut issues = Vec::new();
    let mut departments = BTreeSet::new();

    for record in records {
        if let Some(department) = &record.department {
            departments.insert(department.clone());
        }

        let derived = match compute_derived(record, evaluation_date, threshold) {
            Ok(derived) => {
                let end_date = record.exit_date.unwrap_or(evaluation_date);
                if record.joining_date.is_some_and(|joined| end_date < joined) {
                    issues.push(DataQualityIssue::ExitBeforeJoining {
                        id: record.id.clone(),
                    });
                }
                Some(derived)
            }
            Err(err) => {
                debug!(employee_id = %record.id, error = %err, "Skipping derived fields");
                issues.push(DataQualityIssue::MissingJoiningDate {
                    id: record.id.clone(),
                });
                None
            }
        };

        rows.push(EvaluatedRecord {
            record: record.clone(),
            derived,
        });
    }

    EvaluationReport {
        evaluation_date,
        threshold_years: threshold,
        departments: departments.into_iter().collect(),
        rows,
        issues,
    }
}
