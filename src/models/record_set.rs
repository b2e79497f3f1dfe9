//! Ordered, id-unique collection of employee records.

use std::collections::HashMap;

use super::{EmployeeId, EmployeeRecord};

/// What an [`RecordSet::upsert`] did with the record it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was new and the record was appended.
    Inserted,
    /// The id existed and at least one field changed.
    Updated,
    /// The id existed and every supplied field already matched.
    Unchanged,
}

/// An ordered collection of [`EmployeeRecord`]s, unique by id.
///
/// Insertion order is preserved; updates happen in place.
///
/// # Examples
///
/// ```
/// use gratuity_tracker::models::{EmployeeId, EmployeeRecord, RecordSet, UpsertOutcome};
///
/// let mut set = RecordSet::new();
/// let id = EmployeeId::parse("E001").unwrap();
/// assert_eq!(set.upsert(EmployeeRecord::new(id.clone())), UpsertOutcome::Inserted);
/// assert_eq!(set.upsert(EmployeeRecord::new(id)), UpsertOutcome::Unchanged);
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<EmployeeRecord>,
    index: HashMap<EmployeeId, usize>,
}

impl RecordSet {
    /// Creates an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new record or overlays it onto the existing one with the same id.
    pub fn upsert(&mut self, record: EmployeeRecord) -> UpsertOutcome {
        match self.index.get(&record.id) {
            Some(&position) => {
                if self.records[position].overlay(&record) {
                    UpsertOutcome::Updated
                } else {
                    UpsertOutcome::Unchanged
                }
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                UpsertOutcome::Inserted
            }
        }
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &EmployeeId) -> Option<&EmployeeRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Returns true if a record with this id exists.
    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeRecord> {
        self.records.iter()
    }

    /// Ids in set order.
    pub fn ids(&self) -> impl Iterator<Item = &EmployeeId> {
        self.records.iter().map(|record| &record.id)
    }

    /// The records as a slice, in set order.
    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }
}

impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for RecordSet {}

impl FromIterator<EmployeeRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = EmployeeRecord>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.upsert(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a EmployeeRecord;
    type IntoIter = std::slice::Iter<'a, EmployeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
