//! The tracker service: upload, merge, evaluate and report.
//!
//! [`Tracker`] ties the pure calculation layer to a [`RecordStore`]. It owns
//! the one piece of shared mutable state in the system, the persisted record
//! set, and serialises every load → merge → save cycle behind a mutex so
//! concurrent uploads within the process cannot lose each other's updates.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{RecordFilter, evaluate, reconcile};
use crate::config::MailConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::export::write_report_csv;
use crate::ingest::{UploadFormat, parse_upload};
use crate::models::{DataQualityIssue, EmployeeId, EvaluationReport, RecordSet};
use crate::notify::ReportEmail;
use crate::store::RecordStore;

/// Summary of one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    /// Data rows read from the file.
    pub rows_read: usize,
    /// Records in the stored set after the merge.
    pub total: usize,
    /// Ids added by this upload.
    pub inserted: Vec<EmployeeId>,
    /// Ids whose stored fields changed.
    pub updated: Vec<EmployeeId>,
    /// Ids the upload repeated without changes.
    pub unchanged: Vec<EmployeeId>,
    /// Problems found while reading the upload.
    pub issues: Vec<DataQualityIssue>,
}

/// Upload, merge and reporting over a single record store.
pub struct Tracker {
    store: Arc<dyn RecordStore>,
    threshold: Decimal,
    write_lock: Mutex<()>,
}

impl Tracker {
    /// Creates a tracker over `store` using `threshold` unless a call overrides it.
    pub fn new(store: Arc<dyn RecordStore>, threshold: Decimal) -> Self {
        Self {
            store,
            threshold,
            write_lock: Mutex::new(()),
        }
    }

    /// Parses an upload and merges it into the stored set.
    ///
    /// The upload is fully parsed before the store is touched, so a rejected
    /// file (malformed, missing columns) leaves the stored set unchanged.
    pub fn ingest(&self, bytes: &[u8], format: UploadFormat) -> TrackerResult<IngestOutcome> {
        let batch = parse_upload(bytes, format)?;
        for issue in &batch.issues {
            warn!(issue = %issue, "Upload data-quality issue");
        }

        let _guard = self.write_lock.lock().map_err(|_| TrackerError::Storage {
            path: self.store.location(),
            message: "write lock poisoned".to_string(),
        })?;

        let existing = self.store.load()?.unwrap_or_default();
        let merged = reconcile(existing, &batch.records);
        self.store.save(&merged.records)?;

        info!(
            store = %self.store.location(),
            rows = batch.rows_read,
            inserted = merged.inserted.len(),
            updated = merged.updated.len(),
            unchanged = merged.unchanged.len(),
            total = merged.records.len(),
            "Merged upload into record store"
        );

        Ok(IngestOutcome {
            rows_read: batch.rows_read,
            total: merged.records.len(),
            inserted: merged.inserted,
            updated: merged.updated,
            unchanged: merged.unchanged,
            issues: batch.issues,
        })
    }

    /// The stored set, or an empty set if nothing has been uploaded.
    pub fn records(&self) -> TrackerResult<RecordSet> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    /// Evaluates the stored set and applies `filter` to the rows.
    ///
    /// `departments` in the result lists every department in the stored set,
    /// not only the filtered ones. `threshold` overrides the configured one.
    pub fn report(
        &self,
        evaluation_date: NaiveDate,
        threshold: Option<Decimal>,
        filter: &RecordFilter,
    ) -> TrackerResult<EvaluationReport> {
        let records = self.records()?;
        let mut report = evaluate(&records, evaluation_date, threshold.unwrap_or(self.threshold));
        report.rows = filter.apply(report.rows);
        Ok(report)
    }

    /// The filtered report as CSV with derived columns.
    pub fn export_csv(
        &self,
        evaluation_date: NaiveDate,
        threshold: Option<Decimal>,
        filter: &RecordFilter,
    ) -> TrackerResult<Vec<u8>> {
        let report = self.report(evaluation_date, threshold, filter)?;
        write_report_csv(&report.rows)
    }

    /// Composes a report email carrying the filtered CSV.
    pub fn report_email(
        &self,
        mail: &MailConfig,
        recipient: &str,
        evaluation_date: NaiveDate,
        threshold: Option<Decimal>,
        filter: &RecordFilter,
    ) -> TrackerResult<ReportEmail> {
        let csv = self.export_csv(evaluation_date, threshold, filter)?;
        Ok(ReportEmail::from_config(mail, recipient, csv))
    }
}
