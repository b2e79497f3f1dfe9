//! Calculation logic for the Gratuity Tracker.
//!
//! This module contains the tenure and eligibility calculator, the upsert
//! reconciler that merges uploaded batches into the stored set, whole-set
//! evaluation with data-quality reporting, and record filtering.

mod eligibility;
mod evaluate;
mod filter;
mod reconcile;

pub use eligibility::{DAYS_PER_YEAR, DEFAULT_GRATUITY_THRESHOLD, completed_years, compute_derived};
pub use evaluate::evaluate;
pub use filter::RecordFilter;
pub use reconcile::{Reconciliation, merge, reconcile};
