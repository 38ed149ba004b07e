//! Yearly holiday calendar with multi-day event bars.
//!
//! Features:
//! - Month layout engine: spans, week segments and row slots for event bars
//! - Configurable cap on visible bar rows with `+N` overflow counts
//! - In-memory event store with PTO-day counting
//! - Terminal rendering of single months and whole years

pub mod args;
pub mod calendar;
pub mod config;
pub mod error;
pub mod events_file;
pub mod formatter;
pub mod layout;
pub mod logging;
pub mod segments;
pub mod slots;
pub mod spans;
pub mod store;
pub mod types;
