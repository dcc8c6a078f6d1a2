//! In-memory analysis over ingested tables.
//!
//! Everything here takes its inputs by reference and returns new values; running a step twice on
//! the same input gives the same output.
//!
//! - [`filter()`] / [`RegionFilter`]: row selection before grouping
//! - [`reduce()`] / [`sum_metric`]: single-column reductions
//! - [`aggregate()`]: group-by sums into a [`GroupedTable`]
//! - [`bucket_dates`]: day/month/year time buckets
//! - [`detect_anomalies`]: z-score outliers over a grouped metric
//!
//! ## Example: district spike detection
//!
//! ```rust
//! use enrolment_insights::processing::{aggregate, detect_anomalies};
//! use enrolment_insights::types::{DataType, Field, Schema, Table, Value};
//!
//! let table = Table::new(
//!     Schema::new(vec![
//!         Field::new("district", DataType::Utf8),
//!         Field::new("bio_age_17_", DataType::Int64),
//!     ]),
//!     vec![
//!         vec![Value::Utf8("Pune".into()), Value::Int64(100)],
//!         vec![Value::Utf8("Mumbai".into()), Value::Int64(110)],
//!         vec![Value::Utf8("Nagpur".into()), Value::Int64(500)],
//!     ],
//! );
//!
//! let grouped = aggregate(&table, &["district"], &["bio_age_17_"]).unwrap();
//! let report = detect_anomalies(&grouped, "bio_age_17_", 1.0).unwrap();
//! let alerts = report.alerts();
//! assert_eq!(alerts.len(), 1);
//! assert_eq!(alerts[0].label, "Nagpur");
//! ```

pub mod aggregate;
pub mod anomaly;
pub mod bucket;
pub mod filter;
pub mod reduce;

pub use aggregate::{GroupedRow, GroupedTable, aggregate};
pub use anomaly::{
    Alert, AnomalyOptions, AnomalyReport, DEFAULT_Z_SCORE_THRESHOLD, ScoredRow, Tail, detect_anomalies,
    detect_anomalies_with,
};
pub use bucket::{TimeBucket, bucket_dates};
pub use filter::{ALL_REGIONS_LABEL, RegionFilter, filter, region_options};
pub use reduce::{ReduceOp, reduce, sum_metric};
