//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] (from [`pipeline`]) which, for each uploaded file:
//!
//! - parses comma-separated text and normalizes the header row ([`csv`])
//! - coerces dates (day-first) and counts, degrading bad cells to null ([`coerce`])
//! - classifies the file by its columns and merges it into a [`DatasetMap`]
//! - reports skipped files as [`Diagnostic`]s and, optionally, to an [`IngestionObserver`]
//!
//! [`IngestionCache`] memoizes whole batches by content fingerprint.

pub mod cache;
pub mod coerce;
pub mod csv;
pub mod observability;
pub mod pipeline;
pub mod source;

pub use cache::{DEFAULT_CACHE_CAPACITY, Fingerprint, IngestionCache};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    LogObserver,
};
pub use pipeline::{
    ClassifiedTable, DatasetMap, Diagnostic, DiagnosticKind, IngestOutcome, IngestionOptions, ingest, ingest_file,
    ingest_paths,
};
pub use source::{SourceFile, sources_from_dir};
