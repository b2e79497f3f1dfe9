//! Tenure and gratuity eligibility calculation.
//!
//! Tenure is measured in fixed 365-day years from the joining date to the
//! exit date, or to the evaluation date while the employee is still working.
//! There is no leap-year correction.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{DerivedFields, EmployeeRecord, EmploymentStatus};

/// Default gratuity threshold in completed years.
pub const DEFAULT_GRATUITY_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Length of a tenure year in days.
pub const DAYS_PER_YEAR: i64 = 365;

/// Returns the tenure between two dates in 365-day years, rounded to 2 dp.
///
/// Rounding is half-to-even on the exact decimal quotient. A 365-day year
/// never produces an exact midpoint at two decimals, so this agrees with
/// ordinary rounding.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::completed_years;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let joined = NaiveDate::from_ymd_opt(2018, 1, 10).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
/// // 1826 days / 365 = 5.0027...
/// assert_eq!(completed_years(joined, end), Decimal::new(500, 2));
/// ```
pub fn completed_years(joining_date: NaiveDate, end_date: NaiveDate) -> Decimal {
    let days = (end_date - joining_date).num_days();
    (Decimal::from(days) / Decimal::from(DAYS_PER_YEAR)).round_dp(2)
}

/// Computes the derived fields of a record as of `evaluation_date`.
///
/// - `completed_years` runs to the exit date if one is recorded, otherwise
///   to `evaluation_date`.
/// - `status` is [`EmploymentStatus::Exited`] only when the exit date is
///   strictly before `evaluation_date`; a future exit date still reads as
///   working.
/// - `gratuity_eligible` is `completed_years >= threshold`.
///
/// # Errors
///
/// Returns [`TrackerError::MissingJoiningDate`] if the record has no joining
/// date.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::{compute_derived, DEFAULT_GRATUITY_THRESHOLD};
/// use gratuity_tracker::models::{EmployeeId, EmployeeRecord, EmploymentStatus};
/// use chrono::NaiveDate;
///
/// let mut record = EmployeeRecord::new(EmployeeId::parse("E001").unwrap());
/// record.joining_date = NaiveDate::from_ymd_opt(2015, 6, 1);
/// record.exit_date = NaiveDate::from_ymd_opt(2023, 6, 1);
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let derived = compute_derived(&record, today, DEFAULT_GRATUITY_THRESHOLD).unwrap();
///
/// assert_eq!(derived.status, EmploymentStatus::Exited);
/// assert!(derived.gratuity_eligible);
/// ```
pub fn compute_derived(
    record: &EmployeeRecord,
    evaluation_date: NaiveDate,
    threshold: Decimal,
) -> TrackerResult<DerivedFields> {
    let joining_date = record
        .joining_date
        .ok_or_else(|| TrackerError::MissingJoiningDate {
            id: record.id.to_string(),
        })?;

    let end_date = record.exit_date.unwrap_or(evaluation_date);
    let completed_years = completed_years(joining_date, end_date);

    let status = match record.exit_date {
        Some(exit_date) if exit_date < evaluation_date => EmploymentStatus::Exited,
        _ => EmploymentStatus::Working,
    };

    Ok(DerivedFields {
        completed_years,
        status,
        gratuity_eligible: completed_years >= threshold,
    })
}
