//! Employee record model and identifier canonicalisation.
//!
//! This module defines [`EmployeeId`] and [`EmployeeRecord`], the unit that
//! uploads, the reconciler and the record store all work with.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical employee identifier.
///
/// Spreadsheets frequently turn `1001` into `1001.0`; both collapse to the
/// same identifier so numeric and textual ids compare equal.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::models::EmployeeId;
///
/// let from_text = EmployeeId::parse(" 1001 ").unwrap();
/// let from_float = EmployeeId::parse("1001.0").unwrap();
/// assert_eq!(from_text, from_float);
/// assert_eq!(from_text.as_str(), "1001");
/// assert!(EmployeeId::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Parses a raw cell value into its canonical form.
    ///
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(collapse_integral(trimmed).to_string()))
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strips an all-zero fractional part from a plain integer (`"42.00"` -> `"42"`).
/// Leading zeros are part of the id and are kept.
fn collapse_integral(value: &str) -> &str {
    match value.split_once('.') {
        Some((whole, fraction))
            if !whole.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && !fraction.is_empty()
                && fraction.chars().all(|c| c == '0') =>
        {
            whole
        }
        _ => value,
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "employee id must not be empty".to_string())
    }
}

impl From<EmployeeId> for String {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

/// A single employee row.
///
/// Every field except the id is optional: an upload may carry only the
/// fields it wants to change, and unparseable dates arrive as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique key within a record set.
    pub id: EmployeeId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Department, used for grouping and filtering.
    #[serde(default)]
    pub department: Option<String>,
    /// The first day of employment.
    #[serde(default)]
    pub joining_date: Option<NaiveDate>,
    /// The last day of employment, absent while still employed.
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
}

impl EmployeeRecord {
    /// Creates a record with only an identifier set.
    pub fn new(id: EmployeeId) -> Self {
        Self {
            id,
            name: None,
            department: None,
            joining_date: None,
            exit_date: None,
        }
    }

    /// Applies every field the incoming record supplies on top of this one.
    ///
    /// Fields that are `None` in `incoming` leave the current value intact.
    /// Returns `true` if any value changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gratuity_tracker::models::{EmployeeId, EmployeeRecord};
    /// use chrono::NaiveDate;
    ///
    /// let id = EmployeeId::parse("E001").unwrap();
    /// let mut stored = EmployeeRecord::new(id.clone());
    /// stored.name = Some("John Doe".to_string());
    /// stored.joining_date = NaiveDate::from_ymd_opt(2015, 6, 1);
    ///
    /// let mut update = EmployeeRecord::new(id);
    /// update.exit_date = NaiveDate::from_ymd_opt(2023, 6, 1);
    ///
    /// assert!(stored.overlay(&update));
    /// assert_eq!(stored.name.as_deref(), Some("John Doe"));
    /// assert_eq!(stored.exit_date, NaiveDate::from_ymd_opt(2023, 6, 1));
    /// ```
    pub fn overlay(&mut self, incoming: &EmployeeRecord) -> bool {
        let mut changed = false;
        changed |= overlay_field(&mut self.name, &incoming.name);
        changed |= overlay_field(&mut self.department, &incoming.department);
        changed |= overlay_field(&mut self.joining_date, &incoming.joining_date);
        changed |= overlay_field(&mut self.exit_date, &incoming.exit_date);
        changed
    }
}

fn overlay_field<T: Clone + PartialEq>(current: &mut Option<T>, incoming: &Option<T>) -> bool {
    match incoming {
        Some(value) if current.as_ref() != Some(value) => {
            *current = Some(value.clone());
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EmployeeId {
        EmployeeId::parse(raw).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_id_trims_whitespace() {
        assert_eq!(id("  E001\t").as_str(), "E001");
    }

    #[test]
    fn test_id_collapses_integral_floats() {
        assert_eq!(id("1001.0").as_str(), "1001");
        assert_eq!(id("1001.000").as_str(), "1001");
        assert_eq!(id("1001"), id("1001.0"));
    }

    #[test]
    fn test_id_keeps_non_integral_forms() {
        assert_eq!(id("1001.5").as_str(), "1001.5");
        assert_eq!(id("E1.0").as_str(), "E1.0");
        assert_eq!(id(".0").as_str(), ".0");
        assert_eq!(id("12.").as_str(), "12.");
    }

    #[test]
    fn test_id_keeps_leading_zeros() {
        assert_eq!(id("0012").as_str(), "0012");
        assert_eq!(id("0012.0").as_str(), "0012");
        assert_ne!(id("0012"), id("12"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(EmployeeId::parse("").is_none());
        assert!(EmployeeId::parse("  ").is_none());
    }

    #[test]
    fn test_id_deserialization_canonicalises() {
        let parsed: EmployeeId = serde_json::from_str("\"77.0\"").unwrap();
        assert_eq!(parsed.as_str(), "77");
        assert!(serde_json::from_str::<EmployeeId>("\" \"").is_err());
    }

    #[test]
    fn test_deserialize_partial_record() {
        let json = r#"{ "id": "E001", "exit_date": "2023-06-01" }"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, id("E001"));
        assert_eq!(record.exit_date, Some(date(2023, 6, 1)));
        assert!(record.name.is_none());
        assert!(record.joining_date.is_none());
    }

    #[test]
    fn test_overlay_only_touches_supplied_fields() {
        let mut stored = EmployeeRecord {
            id: id("E001"),
            name: Some("John Doe".to_string()),
            department: Some("HR".to_string()),
            joining_date: Some(date(2015, 6, 1)),
            exit_date: None,
        };
        let update = EmployeeRecord {
            id: id("E001"),
            name: None,
            department: Some("Finance".to_string()),
            joining_date: None,
            exit_date: Some(date(2023, 6, 1)),
        };

        assert!(stored.overlay(&update));
        assert_eq!(stored.name.as_deref(), Some("John Doe"));
        assert_eq!(stored.department.as_deref(), Some("Finance"));
        assert_eq!(stored.joining_date, Some(date(2015, 6, 1)));
        assert_eq!(stored.exit_date, Some(date(2023, 6, 1)));
    }

    #[test]
    fn test_overlay_reports_no_change_for_identical_values() {
        let mut stored = EmployeeRecord::new(id("E001"));
        stored.department = Some("HR".to_string());
        let mut update = EmployeeRecord::new(id("E001"));
        update.department = Some("HR".to_string());

        assert!(!stored.overlay(&update));
        assert!(!stored.overlay(&EmployeeRecord::new(id("E001"))));
    }
}
