//! Reduction operations for [`crate::types::Table`].

use std::collections::HashSet;

use crate::types::{Table, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum integer values, ignoring nulls.
    Sum,
    /// Minimum value, ignoring nulls.
    Min,
    /// Maximum value, ignoring nulls.
    Max,
    /// Number of distinct non-null values.
    CountDistinct,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`, returns `Some(Value::Null)` if there are no integer values.
/// - For `Min`/`Max`, returns `Some(Value::Null)` if there are no non-null values.
/// - For `Count` and `CountDistinct`, always returns `Some(Value::Int64(_))`.
pub fn reduce(table: &Table, column: &str, op: ReduceOp) -> Option<Value> {
    let values = table.column_values(column)?;

    let out = match op {
        ReduceOp::Count => Value::Int64(table.row_count() as i64),
        ReduceOp::Sum => values
            .filter_map(Value::as_i64)
            .reduce(i64::saturating_add)
            .map_or(Value::Null, Value::Int64),
        ReduceOp::Min => values.filter(|v| !v.is_null()).min().cloned().unwrap_or(Value::Null),
        ReduceOp::Max => values.filter(|v| !v.is_null()).max().cloned().unwrap_or(Value::Null),
        ReduceOp::CountDistinct => {
            let distinct: HashSet<&Value> = values.filter(|v| !v.is_null()).collect();
            Value::Int64(distinct.len() as i64)
        }
    };
    Some(out)
}

/// Total of a metric column, with an absent column or null cells counting as zero.
pub fn sum_metric(table: &Table, column: &str) -> i64 {
    table
        .column_values(column)
        .map(|values| values.filter_map(Value::as_i64).fold(0, i64::saturating_add))
        .unwrap_or(0)
}
