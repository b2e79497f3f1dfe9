//! Department and eligibility filtering of evaluated records.

use serde::{Deserialize, Serialize};

use crate::models::EvaluatedRecord;

/// Selects which evaluated records are shown or exported.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::RecordFilter;
///
/// let filter = RecordFilter::default();
/// assert!(filter.departments.is_none());
/// assert!(!filter.eligible_only);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Departments to keep; `None` keeps every department.
    #[serde(default)]
    pub departments: Option<Vec<String>>,
    /// Keep only records that are gratuity eligible.
    #[serde(default)]
    pub eligible_only: bool,
}

impl RecordFilter {
    /// Returns true if the row passes both criteria.
    ///
    /// With a department list, rows without a department never match.
    /// Rows without derived fields are never eligible.
    pub fn matches(&self, row: &EvaluatedRecord) -> bool {
        let department_ok = match &self.departments {
            None => true,
            Some(allowed) => row
                .record
                .department
                .as_ref()
                .is_some_and(|department| allowed.iter().any(|a| a == department)),
        };

        department_ok && (!self.eligible_only || row.is_eligible())
    }

    /// Keeps the rows that match, preserving order.
    pub fn apply(&self, rows: Vec<EvaluatedRecord>) -> Vec<EvaluatedRecord> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DerivedFields, EmployeeId, EmployeeRecord, EmploymentStatus};
    use rust_decimal::Decimal;

    fn row(raw_id: &str, department: Option<&str>, eligible: Option<bool>) -> EvaluatedRecord {
        let mut record = EmployeeRecord::new(EmployeeId::parse(raw_id).unwrap());
        record.department = department.map(str::to_string);
        EvaluatedRecord {
            record,
            derived: eligible.map(|gratuity_eligible| DerivedFields {
                completed_years: if gratuity_eligible {
                    Decimal::new(600, 2)
                } else {
                    Decimal::new(200, 2)
                },
                status: EmploymentStatus::Working,
                gratuity_eligible,
            }),
        }
    }

    fn ids(rows: &[EvaluatedRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.record.id.as_str()).collect()
    }

    fn sample() -> Vec<EvaluatedRecord> {
        vec![
            row("E001", Some("HR"), Some(true)),
            row("E002", Some("Finance"), Some(false)),
            row("E003", None, Some(true)),
            row("E004", Some("HR"), None),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let kept = RecordFilter::default().apply(sample());
        assert_eq!(ids(&kept), vec!["E001", "E002", "E003", "E004"]);
    }

    #[test]
    fn test_department_filter() {
        let filter = RecordFilter {
            departments: Some(vec!["HR".to_string()]),
            eligible_only: false,
        };
        assert_eq!(ids(&filter.apply(sample())), vec!["E001", "E004"]);
    }

    #[test]
    fn test_eligible_only_drops_unevaluated_rows() {
        let filter = RecordFilter {
            departments: None,
            eligible_only: true,
        };
        assert_eq!(ids(&filter.apply(sample())), vec!["E001", "E003"]);
    }

    #[test]
    fn test_combined_filters() {
        let filter = RecordFilter {
            departments: Some(vec!["HR".to_string(), "Finance".to_string()]),
            eligible_only: true,
        };
        assert_eq!(ids(&filter.apply(sample())), vec!["E001"]);
    }

    #[test]
    fn test_empty_department_list_matches_nothing() {
        let filter = RecordFilter {
            departments: Some(vec![]),
            eligible_only: false,
        };
        assert!(filter.apply(sample()).is_empty());
    }
}
