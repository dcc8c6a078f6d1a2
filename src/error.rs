use thiserror::Error;

/// Convenience result type for per-file ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when a single file cannot be ingested.
///
/// Batch ingestion ([`crate::ingestion::ingest`]) never returns this directly; each error is
/// captured as a [`crate::ingestion::Diagnostic`] for the offending file and the batch carries on.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid delimited text (invalid UTF-8, unterminated quotes, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A data row carries more fields than the header names.
    #[error("record {record} has {found} fields, but the header has {expected}")]
    TooManyFields {
        record: u64,
        found: usize,
        expected: usize,
    },

    /// Zero bytes, or nothing but whitespace.
    #[error("file is empty")]
    EmptyFile,

    /// The header row has no named columns.
    #[error("no columns found in header row")]
    NoColumns,

    /// Two raw headers collapse to the same canonical key.
    #[error("duplicate column '{key}' after header normalization")]
    DuplicateColumn { key: String },

    /// The file parsed, but no dataset category matches its columns.
    #[error("could not identify dataset type from columns {columns:?}")]
    UnknownSchema { columns: Vec<String> },
}
