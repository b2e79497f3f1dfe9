//! Gratuity Tracker
//!
//! This crate keeps a master list of employee records, merges spreadsheet
//! uploads into it by employee id, and derives completed years of service,
//! employment status and gratuity eligibility for reporting.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod models;
pub mod notify;
pub mod store;
pub mod tracker;
