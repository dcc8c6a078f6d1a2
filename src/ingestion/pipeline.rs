//! Batch ingestion: parse, normalize, classify and merge a set of uploaded files.
//!
//! Every file is processed in isolation. A file that is empty, unparsable, or of an unrecognized
//! schema is reported as a [`Diagnostic`] and skipped; it never aborts the rest of the batch.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::category::{Category, classify};
use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::csv::ingest_csv_from_bytes;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::source::{SourceFile, display_name};

/// Options controlling batch ingestion.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Field delimiter (default `,`).
    pub delimiter: u8,
    /// Parse files on the rayon thread pool. Merge order is unaffected.
    pub parallel: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("parallel", &self.parallel)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            parallel: false,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Kind of a recoverable, file-level ingestion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    EmptyFile,
    UnparsableFile,
    UnknownSchema,
}

/// A non-fatal report tied to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file_name: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Build the diagnostic that reports `error` for `file_name`.
    pub fn from_error(file_name: impl Into<String>, error: &IngestionError) -> Self {
        let kind = match error {
            IngestionError::EmptyFile => DiagnosticKind::EmptyFile,
            IngestionError::UnknownSchema { .. } => DiagnosticKind::UnknownSchema,
            _ => DiagnosticKind::UnparsableFile,
        };
        Self {
            file_name: file_name.into(),
            kind,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} in {}: {}", self.kind, self.file_name, self.message)
    }
}

/// Category → merged table. Never holds [`Category::Unknown`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DatasetMap {
    tables: BTreeMap<Category, Table>,
}

impl DatasetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&Table> {
        self.tables.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.tables.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.tables.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Table)> {
        self.tables.iter().map(|(c, t)| (*c, t))
    }

    /// Append `table` to the table already held for `category`, or start one.
    ///
    /// Returns `false` (and stores nothing) for [`Category::Unknown`].
    pub fn merge(&mut self, category: Category, table: Table) -> bool {
        if category == Category::Unknown {
            return false;
        }
        let merged = match self.tables.remove(&category) {
            Some(existing) => existing.concat(table),
            None => table,
        };
        self.tables.insert(category, merged);
        true
    }

    /// Apply `f` to every table, keeping categories.
    pub fn map_tables<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Table) -> Table,
    {
        Self {
            tables: self.tables.iter().map(|(c, t)| (*c, f(t))).collect(),
        }
    }
}

/// Result of a batch ingestion: the merged tables plus one diagnostic per skipped file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IngestOutcome {
    pub datasets: DatasetMap,
    pub diagnostics: Vec<Diagnostic>,
}

/// A single file after parsing and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTable {
    pub category: Category,
    pub table: Table,
}

/// Parse and classify one file.
///
/// Returns [`IngestionError::UnknownSchema`] when no category matches.
pub fn ingest_file(file: &SourceFile, options: &IngestionOptions) -> IngestionResult<ClassifiedTable> {
    let table = ingest_csv_from_bytes(&file.bytes, options.delimiter)?;
    let keys: Vec<&str> = table.schema.field_names().collect();
    match classify(&keys) {
        Category::Unknown => Err(IngestionError::UnknownSchema {
            columns: keys.iter().map(|k| k.to_string()).collect(),
        }),
        category => Ok(ClassifiedTable { category, table }),
    }
}

/// Ingest a batch of files into a [`DatasetMap`].
///
/// Rows of files sharing a category are concatenated in file order, then in-file order.
///
/// # Examples
///
/// ```
/// use enrolment_insights::category::Category;
/// use enrolment_insights::ingestion::{ingest, DiagnosticKind, IngestionOptions, SourceFile};
///
/// let files = vec![
///     SourceFile::new("enrol.csv", "Date,State,District,AGE-0-5\n13-09-2025,Bihar,Patna,4\n"),
///     SourceFile::new("blank.csv", ""),
/// ];
/// let outcome = ingest(&files, &IngestionOptions::default());
///
/// assert_eq!(outcome.datasets.get(Category::Enrolment).unwrap().row_count(), 1);
/// assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::EmptyFile);
/// ```
pub fn ingest(files: &[SourceFile], options: &IngestionOptions) -> IngestOutcome {
    let parsed: Vec<IngestionResult<ClassifiedTable>> = if options.parallel {
        files.par_iter().map(|f| ingest_file(f, options)).collect()
    } else {
        files.iter().map(|f| ingest_file(f, options)).collect()
    };

    let mut outcome = IngestOutcome::default();
    for (file, result) in files.iter().zip(parsed) {
        record(&mut outcome, &file.name, result, options);
    }
    log::debug!(
        "ingested {} file(s): {} dataset(s), {} diagnostic(s)",
        files.len(),
        outcome.datasets.len(),
        outcome.diagnostics.len()
    );
    outcome
}

/// Read and ingest files from disk.
///
/// A path that cannot be read is reported as an `UnparsableFile` diagnostic.
pub fn ingest_paths<P: AsRef<Path>>(paths: &[P], options: &IngestionOptions) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    for path in paths {
        let path = path.as_ref();
        let result = SourceFile::from_path(path).and_then(|file| ingest_file(&file, options));
        record(&mut outcome, &display_name(path), result, options);
    }
    outcome
}

fn record(
    outcome: &mut IngestOutcome,
    file_name: &str,
    result: IngestionResult<ClassifiedTable>,
    options: &IngestionOptions,
) {
    let ctx = IngestionContext {
        file_name: file_name.to_owned(),
    };
    match result {
        Ok(ClassifiedTable { category, table }) => {
            let stats = IngestionStats {
                category,
                rows: table.row_count(),
                columns: table.schema.fields.len(),
            };
            log::debug!("{file_name}: classified as {category} ({} rows)", stats.rows);
            outcome.datasets.merge(category, table);
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(&ctx, stats);
            }
        }
        Err(e) => {
            log::warn!("skipping {file_name}: {e}");
            if let Some(obs) = options.observer.as_ref() {
                let sev = IngestionSeverity::for_error(&e);
                obs.on_failure(&ctx, sev, &e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, &e);
                }
            }
            outcome.diagnostics.push(Diagnostic::from_error(file_name, &e));
        }
    }
}
