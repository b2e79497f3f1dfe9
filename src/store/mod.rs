//! Persistence of the merged record set.
//!
//! A [`RecordStore`] holds exactly one record set: the latest merge result.
//! Every save replaces the previous contents; nothing is appended.
//!
//! Stores do no locking of their own. Callers that run load → merge → save
//! must serialise those steps themselves (see [`crate::tracker::Tracker`]).

mod memory;
mod xlsx;

use crate::error::TrackerResult;
use crate::models::RecordSet;

pub use memory::MemoryRecordStore;
pub use xlsx::XlsxRecordStore;

/// Load/store access to the persisted record set.
pub trait RecordStore: Send + Sync {
    /// Returns the stored set, or `None` if nothing has been stored yet.
    fn load(&self) -> TrackerResult<Option<RecordSet>>;

    /// Replaces the stored set.
    fn save(&self, records: &RecordSet) -> TrackerResult<()>;

    /// A human-readable description of where records live, for logs.
    fn location(&self) -> String;
}
