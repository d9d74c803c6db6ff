//! Drilling time-series ingestion for WITS replay
//!
//! Turns a Volve-style drilling CSV (Kaggle / drilling contractor column
//! names, metric units) into an ordered sequence of
//! [`CanonicalRecord`](wits_protocol::CanonicalRecord)s in oilfield units.
//!
//! # Pipeline
//!
//! 1. Header row → [`ColumnMap`] (prefix rules, last matching column wins)
//! 2. Each data row → raw metric sample (blank / `nan` / `null` / `-` → 0.0)
//! 3. Sensor-gap rows (WOB, RPM, ROP, SPP and bit depth all zero) are skipped
//! 4. Surviving rows are converted metric → oilfield ([`units`])
//!
//! # Example
//!
//! ```no_run
//! use wits_ingest::load_csv;
//!
//! let report = load_csv("wells/F-9A.csv")?;
//! println!("{} records, {} skipped", report.records.len(), report.skipped);
//! # Ok::<(), wits_ingest::IngestError>(())
//! ```

pub mod columns;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod units;

// Re-exports
pub use columns::{ColumnMap, Field};
pub use discovery::{estimate_records, first_well, list_wells, WellFile};
pub use error::{IngestError, Result};
pub use loader::{load_csv, load_from_reader, IngestReport, TimeSpan};
