//! Core data models for the Gratuity Tracker.
//!
//! This module contains the domain models used throughout the crate.

mod employee;
mod evaluation;
mod record_set;

pub use employee::{EmployeeId, EmployeeRecord};
pub use evaluation::{
    DataQualityIssue, DerivedFields, EmploymentStatus, EvaluatedRecord, EvaluationReport,
};
pub use record_set::{RecordSet, UpsertOutcome};
