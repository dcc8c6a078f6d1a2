//! Row filtering for [`crate::types::Table`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::ingestion::DatasetMap;
use crate::types::{Table, Value};

/// Label conventionally shown for the all-regions selection.
pub const ALL_REGIONS_LABEL: &str = "All India";

/// Returns a new [`Table`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`Table::filter_rows`].
pub fn filter<F>(table: &Table, predicate: F) -> Table
where
    F: FnMut(&[Value]) -> bool,
{
    table.filter_rows(predicate)
}

/// Region selection applied to every table before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionFilter {
    /// Keep all rows.
    #[default]
    All,
    /// Keep rows whose `state` equals the given name.
    State(String),
}

impl RegionFilter {
    /// Interpret a selector label; [`ALL_REGIONS_LABEL`] selects every region.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_REGIONS_LABEL {
            RegionFilter::All
        } else {
            RegionFilter::State(label.to_owned())
        }
    }

    /// Filter one table. A state filter on a table without a `state` column yields no rows.
    pub fn apply(&self, table: &Table) -> Table {
        match self {
            RegionFilter::All => table.clone(),
            RegionFilter::State(name) => match table.schema.index_of(columns::STATE) {
                Some(idx) => filter(table, |row| {
                    row.get(idx).and_then(Value::as_str) == Some(name.as_str())
                }),
                None => Table::new(table.schema.clone(), Vec::new()),
            },
        }
    }

    /// Filter every table of a dataset map.
    pub fn apply_all(&self, datasets: &DatasetMap) -> DatasetMap {
        datasets.map_tables(|t| self.apply(t))
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str(ALL_REGIONS_LABEL),
            RegionFilter::State(name) => f.write_str(name),
        }
    }
}

/// Sorted distinct state names across all datasets.
pub fn region_options(datasets: &DatasetMap) -> Vec<String> {
    let states: BTreeSet<String> = datasets
        .iter()
        .flat_map(|(_, t)| t.distinct(columns::STATE))
        .filter_map(|v| v.as_str().map(str::to_owned))
        .collect();
    states.into_iter().collect()
}
