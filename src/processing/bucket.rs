//! Calendar bucketing of the `date` column.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::columns;
use crate::types::{Table, Value};

/// Granularity of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    #[default]
    Day,
    Month,
    Year,
}

impl TimeBucket {
    /// First day of the bucket containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeBucket::Day => date,
            TimeBucket::Month => date.with_day(1).unwrap_or(date),
            TimeBucket::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }
}

/// Replace every `date` cell with the start of its bucket, so that grouping by `date` yields a
/// series at the chosen granularity. Tables without a `date` column are returned unchanged.
pub fn bucket_dates(table: &Table, bucket: TimeBucket) -> Table {
    let Some(idx) = table.schema.index_of(columns::DATE) else {
        return table.clone();
    };
    if bucket == TimeBucket::Day {
        return table.clone();
    }
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(Value::Date(d)) = out.get_mut(idx) {
                *d = bucket.start_of(*d);
            }
            out
        })
        .collect();
    Table::new(table.schema.clone(), rows)
}
