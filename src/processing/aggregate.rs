//! Group-by summation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Table, Value};

/// One output group: the group-key values and one sum per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedRow {
    /// Values of the group keys, in [`GroupedTable::group_keys`] order.
    pub keys: Vec<Value>,
    /// Sums, in [`GroupedTable::metric_keys`] order.
    pub sums: Vec<i64>,
}

impl GroupedRow {
    /// Group-key values joined with `" / "`, for display.
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GroupedTable {
    pub group_keys: Vec<String>,
    pub metric_keys: Vec<String>,
    pub rows: Vec<GroupedRow>,
}

impl GroupedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metric_keys.iter().position(|k| k == metric)
    }

    /// Per-row sums of `metric`, in row order.
    pub fn metric_values(&self, metric: &str) -> Option<Vec<i64>> {
        let idx = self.metric_index(metric)?;
        Some(self.rows.iter().map(|r| r.sums[idx]).collect())
    }

    /// Column totals across all groups, in metric order.
    pub fn totals(&self) -> Vec<i64> {
        let mut totals = vec![0_i64; self.metric_keys.len()];
        for row in &self.rows {
            for (total, v) in totals.iter_mut().zip(&row.sums) {
                *total = total.saturating_add(*v);
            }
        }
        totals
    }

    /// Copy of the table ordered by `metric`, largest first (ties keep group order).
    ///
    /// Returns `None` if `metric` was not aggregated.
    pub fn sorted_by_metric_desc(&self, metric: &str) -> Option<Self> {
        let idx = self.metric_index(metric)?;
        let mut out = self.clone();
        out.rows.sort_by(|a, b| b.sums[idx].cmp(&a.sums[idx]));
        Some(out)
    }
}

/// Sum `metric_keys` per distinct combination of `group_keys`.
///
/// - Rows come out in ascending order of the group-key tuple.
/// - A metric column absent from `table` sums to zero for every group; null or non-integer cells
///   count as zero.
/// - Rows with a null in any group key are left out.
/// - An empty `table` yields an empty result.
/// - Returns `None` if a group-key column is absent from `table`.
///
/// # Examples
///
/// ```
/// use enrolment_insights::processing::aggregate;
/// use enrolment_insights::types::{DataType, Field, Schema, Table, Value};
///
/// let table = Table::new(
///     Schema::new(vec![
///         Field::new("district", DataType::Utf8),
///         Field::new("age_0_5", DataType::Int64),
///     ]),
///     vec![
///         vec![Value::Utf8("Pune".into()), Value::Int64(3)],
///         vec![Value::Utf8("Gaya".into()), Value::Int64(1)],
///         vec![Value::Utf8("Pune".into()), Value::Int64(2)],
///     ],
/// );
///
/// let grouped = aggregate(&table, &["district"], &["age_0_5", "age_5_17"]).unwrap();
/// assert_eq!(grouped.rows[0].keys, vec![Value::Utf8("Gaya".into())]);
/// assert_eq!(grouped.rows[1].sums, vec![5, 0]);
/// ```
pub fn aggregate(table: &Table, group_keys: &[&str], metric_keys: &[&str]) -> Option<GroupedTable> {
    let group_idxs = group_keys
        .iter()
        .map(|k| table.schema.index_of(k))
        .collect::<Option<Vec<_>>>()?;
    let metric_idxs: Vec<Option<usize>> = metric_keys.iter().map(|k| table.schema.index_of(k)).collect();

    let mut groups: BTreeMap<Vec<Value>, Vec<i64>> = BTreeMap::new();
    for row in &table.rows {
        let keys: Vec<Value> = group_idxs
            .iter()
            .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        if keys.iter().any(Value::is_null) {
            continue;
        }

        let sums = groups.entry(keys).or_insert_with(|| vec![0; metric_idxs.len()]);
        for (sum, idx) in sums.iter_mut().zip(&metric_idxs) {
            let v = idx.and_then(|i| row.get(i)).and_then(Value::as_i64).unwrap_or(0);
            *sum = sum.saturating_add(v);
        }
    }

    Some(GroupedTable {
        group_keys: group_keys.iter().map(|k| k.to_string()).collect(),
        metric_keys: metric_keys.iter().map(|k| k.to_string()).collect(),
        rows: groups
            .into_iter()
            .map(|(keys, sums)| GroupedRow { keys, sums })
            .collect(),
    })
}
