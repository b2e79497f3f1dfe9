//! Record reconciliation (upsert merge).
//!
//! Merges a freshly uploaded batch into the previously stored record set,
//! keyed by canonical employee id.

use serde::Serialize;

use crate::models::{EmployeeId, RecordSet, UpsertOutcome};

/// The outcome of merging an incoming batch into an existing set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// The merged record set.
    #[serde(skip)]
    pub records: RecordSet,
    /// Ids that were not in the existing set, in upload order.
    pub inserted: Vec<EmployeeId>,
    /// Existing ids where at least one field changed, in upload order.
    pub updated: Vec<EmployeeId>,
    /// Existing ids the batch touched without changing anything.
    pub unchanged: Vec<EmployeeId>,
}

/// Merges `incoming` into `existing`, recording what happened to each id.
///
/// - Ids in both sets: each field the incoming record supplies overwrites the
///   stored value; absent fields leave the stored value untouched.
/// - Ids only in `incoming`: appended after the existing records, in upload
///   order.
/// - Ids only in `existing`: kept unchanged and in place.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::calculation::reconcile;
/// use gratuity_tracker::models::{EmployeeId, EmployeeRecord, RecordSet};
///
/// let existing: RecordSet = vec![EmployeeRecord::new(EmployeeId::parse("E001").unwrap())]
///     .into_iter()
///     .collect();
/// let incoming: RecordSet = vec![EmployeeRecord::new(EmployeeId::parse("E002").unwrap())]
///     .into_iter()
///     .collect();
///
/// let result = reconcile(existing, &incoming);
/// assert_eq!(result.records.len(), 2);
/// assert_eq!(result.inserted, vec![EmployeeId::parse("E002").unwrap()]);
/// ```
pub fn reconcile(existing: RecordSet, incoming: &RecordSet) -> Reconciliation {
    let mut records = existing;
    let mut inserted = Vec::new();
    let mut updated = Vec::new();
    let mut unchanged = Vec::new();

    for record in incoming {
        let id = record.id.clone();
        match records.upsert(record.clone()) {
            UpsertOutcome::Inserted => inserted.push(id),
            UpsertOutcome::Updated => updated.push(id),
            UpsertOutcome::Unchanged => unchanged.push(id),
        }
    }

    Reconciliation {
        records,
        inserted,
        updated,
        unchanged,
    }
}

/// Merges `incoming` into `existing` and returns only the merged set.
///
/// See [`reconcile`] for the merge rules.
pub fn merge(existing: RecordSet, incoming: &RecordSet) -> RecordSet {
    reconcile(existing, incoming).records
}
