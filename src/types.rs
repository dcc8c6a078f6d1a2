//! Core data model types.
//!
//! Ingestion produces a [`Table`] per file: a [`Schema`] of normalized column keys plus row-major
//! [`Value`] storage. Tables are immutable once handed to the processing layer; every processing
//! function returns a new value instead of mutating its input.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer (counts, postal codes).
    Int64,
    /// UTF-8 string (region names and pass-through columns).
    Utf8,
    /// Calendar date without a time zone.
    Date,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Canonical column key.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Whether a field with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

/// A single typed cell.
///
/// The variant order doubles as the cross-type sort order used when grouping: nulls first, then
/// integers, strings and dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing, empty or uncoercible value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// In-memory record table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Every row has
/// exactly one cell per field.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Iterate the cells of one column. Returns `None` if the column is absent.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.schema.index_of(column)?;
        Some(self.rows.iter().filter_map(move |row| row.get(idx)))
    }

    /// Sorted distinct non-null values of `column`; empty if the column is absent.
    pub fn distinct(&self, column: &str) -> BTreeSet<Value> {
        self.column_values(column)
            .map(|values| values.filter(|v| !v.is_null()).cloned().collect())
            .unwrap_or_default()
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Append the rows of `other` after the rows of `self`.
    ///
    /// The resulting schema is the union of both schemas, in first-seen order. Cells for columns a
    /// side does not have are filled with [`Value::Null`].
    pub fn concat(mut self, other: Table) -> Self {
        let mut widened = false;
        for field in &other.schema.fields {
            if !self.schema.contains(&field.name) {
                self.schema.fields.push(field.clone());
                widened = true;
            }
        }
        if widened {
            let width = self.schema.fields.len();
            for row in &mut self.rows {
                row.resize(width, Value::Null);
            }
        }

        let mapping: Vec<Option<usize>> = self
            .schema
            .fields
            .iter()
            .map(|f| other.schema.index_of(&f.name))
            .collect();
        self.rows.reserve(other.rows.len());
        for row in other.rows {
            let mut out = Vec::with_capacity(mapping.len());
            for src in &mapping {
                out.push(src.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null));
            }
            self.rows.push(out);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(fields: &[(&str, DataType)], rows: Vec<Vec<Value>>) -> Table {
        Table::new(
            Schema::new(fields.iter().map(|(n, t)| Field::new(*n, *t)).collect()),
            rows,
        )
    }

    #[test]
    fn value_order_is_null_int_string_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut values = vec![
            Value::Date(date),
            Value::Utf8("b".into()),
            Value::Int64(3),
            Value::Null,
            Value::Utf8("a".into()),
            Value::Int64(-1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Int64(-1),
                Value::Int64(3),
                Value::Utf8("a".into()),
                Value::Utf8("b".into()),
                Value::Date(date),
            ]
        );
    }

    #[test]
    fn concat_unions_columns_and_fills_nulls() {
        let left = table(
            &[("state", DataType::Utf8), ("age_0_5", DataType::Int64)],
            vec![vec![Value::Utf8("Bihar".into()), Value::Int64(4)]],
        );
        let right = table(
            &[("age_5_17", DataType::Int64), ("state", DataType::Utf8)],
            vec![vec![Value::Int64(9), Value::Utf8("Delhi".into())]],
        );

        let merged = left.concat(right);

        assert_eq!(
            merged.schema.field_names().collect::<Vec<_>>(),
            vec!["state", "age_0_5", "age_5_17"]
        );
        assert_eq!(
            merged.rows,
            vec![
                vec![Value::Utf8("Bihar".into()), Value::Int64(4), Value::Null],
                vec![Value::Utf8("Delhi".into()), Value::Null, Value::Int64(9)],
            ]
        );
    }

    #[test]
    fn distinct_skips_nulls_and_missing_columns() {
        let t = table(
            &[("district", DataType::Utf8)],
            vec![
                vec![Value::Utf8("Pune".into())],
                vec![Value::Null],
                vec![Value::Utf8("Pune".into())],
                vec![Value::Utf8("Gaya".into())],
            ],
        );
        assert_eq!(t.distinct("district").len(), 2);
        assert!(t.distinct("state").is_empty());
    }
}
