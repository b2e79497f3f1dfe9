//! In-memory record store.

use std::sync::Mutex;

use crate::error::{TrackerError, TrackerResult};
use crate::models::RecordSet;

use super::RecordStore;

/// A [`RecordStore`] that keeps the set in process memory.
///
/// Used by tests and by runs that do not need persistence.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Option<RecordSet>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `records`.
    pub fn with_records(records: RecordSet) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }
}

fn poisoned() -> TrackerError {
    TrackerError::Storage {
        path: "memory".to_string(),
        message: "store lock poisoned".to_string(),
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> TrackerResult<Option<RecordSet>> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }

    fn save(&self, records: &RecordSet) -> TrackerResult<()> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        *guard = Some(records.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
