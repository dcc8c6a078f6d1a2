//! `enrolment-insights` turns uploaded identity-programme CSV extracts into typed tables and the
//! per-view summaries a dashboard needs.
//!
//! The primary entrypoint is [`ingestion::ingest`], which parses a batch of files, normalizes their
//! headers, classifies each one as enrolment, demographic-update or biometric-update data, and
//! merges same-category files into one [`types::Table`] per category.
//!
//! ## What gets ingested
//!
//! Comma-separated text with a header row. Header names are trimmed, lowercased and have runs of
//! whitespace, hyphens or underscores replaced by `_`, so `Age-0-5`, ` AGE 0 5 ` and `age__0_5`
//! all become `age_0_5`. Cells are typed by column:
//!
//! - `date`: [`types::Value::Date`], parsed day-first (`13-09-2025`, `13/09/2025`, ...)
//! - count columns (`age_*`, `demo_*`, `bio_*`, `pincode`): [`types::Value::Int64`]
//! - everything else: [`types::Value::Utf8`]
//!
//! Cells that do not parse, and cells missing from short rows, become [`types::Value::Null`];
//! they never fail the file. Files that are empty, malformed, or of an unrecognized layout are
//! skipped and reported as [`ingestion::Diagnostic`]s.
//!
//! ## Quick example
//!
//! ```rust
//! use enrolment_insights::category::Category;
//! use enrolment_insights::ingestion::{ingest, IngestionOptions, SourceFile};
//! use enrolment_insights::processing::{aggregate, detect_anomalies};
//!
//! let files = vec![SourceFile::new(
//!     "bio.csv",
//!     "Date,State,District,bio_age_5_17,bio_age_17_\n\
//!      01-03-2025,Maharashtra,Pune,10,100\n\
//!      01-03-2025,Maharashtra,Mumbai,12,110\n\
//!      01-03-2025,Maharashtra,Nagpur,9,500\n",
//! )];
//! let outcome = ingest(&files, &IngestionOptions::default());
//! assert!(outcome.diagnostics.is_empty());
//!
//! let bio = outcome.datasets.get(Category::Biometric).unwrap();
//! let by_district = aggregate(bio, &["district"], &["bio_age_17_"]).unwrap();
//! let report = detect_anomalies(&by_district, "bio_age_17_", 1.0).unwrap();
//! assert_eq!(report.alerts()[0].label, "Nagpur");
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: batch ingestion, CSV parsing, observers and the content-addressed cache
//! - [`columns`] / [`category`]: header normalization and dataset classification
//! - [`types`]: schema and in-memory table types
//! - [`processing`]: filtering, grouping, time buckets and z-score anomaly detection
//! - [`views`]: overview / demographics / biometrics summaries for a front end
//! - [`synthetic`]: seeded mock datasets
//! - [`error`]: error types used across ingestion

pub mod category;
pub mod columns;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod synthetic;
pub mod types;
pub mod views;

pub use error::{IngestionError, IngestionResult};
