use std::path::PathBuf;

use thiserror::Error;

/// Fatal ingestion errors.
///
/// Bad cell values never show up here; they are cleaned to 0.0.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No usable records ({rows_read} rows read, {skipped} skipped as sensor gaps)")]
    NoUsableRecords { rows_read: usize, skipped: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
