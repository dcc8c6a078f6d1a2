//! CSV ingestion implementation.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use crate::columns;
use crate::error::{IngestionError, IngestionResult};
use crate::types::{Field, Schema, Table, Value};

use super::coerce::coerce_cell;

/// Ingest a CSV file into an in-memory [`Table`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, delimiter: u8) -> IngestionResult<Table> {
    let bytes = std::fs::read(path)?;
    ingest_csv_from_bytes(&bytes, delimiter)
}

/// Ingest CSV content held in memory.
///
/// Rules:
///
/// - zero bytes or whitespace-only content is [`IngestionError::EmptyFile`]
/// - the first record is the header row; headers are normalized to canonical keys
/// - a header row with no named columns, or two headers sharing a key, is rejected
/// - a short row is padded with [`Value::Null`]; a row longer than the header is rejected
/// - every cell is coerced according to [`columns::column_type`] of its key; cells that do not
///   coerce become [`Value::Null`]
pub fn ingest_csv_from_bytes(bytes: &[u8], delimiter: u8) -> IngestionResult<Table> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestionError::EmptyFile);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Table> {
    let headers = rdr.headers()?.clone();
    let keys = columns::normalize(&headers.iter().collect::<Vec<_>>());
    if keys.iter().all(|k| k.is_empty()) {
        return Err(IngestionError::NoColumns);
    }

    let mut seen = HashSet::with_capacity(keys.len());
    for key in &keys {
        if !seen.insert(key.as_str()) {
            return Err(IngestionError::DuplicateColumn { key: key.clone() });
        }
    }

    let schema = Schema::new(
        keys.iter()
            .map(|k| Field::new(k.clone(), columns::column_type(k)))
            .collect(),
    );

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > keys.len() {
            return Err(IngestionError::TooManyFields {
                record: record.position().map_or(rows.len() as u64 + 1, |p| p.record()),
                found: record.len(),
                expected: keys.len(),
            });
        }
        let row = schema
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| coerce_cell(record.get(idx).unwrap_or(""), field.data_type))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(schema, rows))
}

/// Write `table` as comma-separated text with a header row.
///
/// Dates are written day-first (`dd-mm-yyyy`) so the output reads back through
/// [`ingest_csv_from_bytes`] unchanged.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> IngestionResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.schema.field_names())?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|v| match v {
            Value::Date(d) => d.format("%d-%m-%Y").to_string(),
            other => other.to_string(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use chrono::NaiveDate;

    #[test]
    fn headers_are_normalized_and_typed() {
        let input = b"Date, State ,District,Pin-Code,AGE-0-5,Remarks\n13-09-2025,Bihar,Patna,800001,12,ok\n";
        let t = ingest_csv_from_bytes(input, b',').unwrap();

        assert_eq!(
            t.schema.field_names().collect::<Vec<_>>(),
            vec!["date", "state", "district", "pin_code", "age_0_5", "remarks"]
        );
        assert_eq!(t.schema.fields[0].data_type, DataType::Date);
        assert_eq!(t.schema.fields[4].data_type, DataType::Int64);
        assert_eq!(
            t.rows[0][0],
            Value::Date(NaiveDate::from_ymd_opt(2025, 9, 13).unwrap())
        );
        assert_eq!(t.rows[0][4], Value::Int64(12));
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert!(matches!(
            ingest_csv_from_bytes(b"", b','),
            Err(IngestionError::EmptyFile)
        ));
        assert!(matches!(
            ingest_csv_from_bytes(b" \n\r\n\t", b','),
            Err(IngestionError::EmptyFile)
        ));
    }

    #[test]
    fn header_only_file_has_schema_and_no_rows() {
        let t = ingest_csv_from_bytes(b"date,state,bio_age_5_17\n", b',').unwrap();
        assert_eq!(t.row_count(), 0);
        assert!(t.schema.contains("bio_age_5_17"));
    }

    #[test]
    fn blank_header_row_is_rejected() {
        assert!(matches!(
            ingest_csv_from_bytes(b" , \n1,2\n", b','),
            Err(IngestionError::NoColumns)
        ));
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let err = ingest_csv_from_bytes(b"Age 0 5,age-0-5\n1,2\n", b',').unwrap_err();
        assert!(err.to_string().contains("duplicate column 'age_0_5'"));
    }

    #[test]
    fn overlong_rows_are_rejected() {
        let err = ingest_csv_from_bytes(b"state,age_0_5\nBihar,1\nDelhi,2,extra\n", b',').unwrap_err();
        assert!(matches!(
            err,
            IngestionError::TooManyFields {
                record: 2,
                found: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn short_rows_are_padded_with_null() {
        let t = ingest_csv_from_bytes(
            b"date,state,district,age_0_5\n01-03-2025,Bihar,Patna,4\n02-03-2025,Bihar,Gaya\n",
            b',',
        )
        .unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[1][2], Value::Utf8("Gaya".to_string()));
        assert_eq!(t.rows[1][3], Value::Null);
    }

    #[test]
    fn bad_cells_degrade_to_null() {
        let t = ingest_csv_from_bytes(b"date,age_0_5\nsoon,many\n", b',').unwrap();
        assert_eq!(t.rows[0], vec![Value::Null, Value::Null]);
    }

    #[test]
    fn custom_delimiter() {
        let t = ingest_csv_from_bytes(b"state;age_0_5\nDelhi;3\n", b';').unwrap();
        assert_eq!(t.rows[0][1], Value::Int64(3));
    }

    #[test]
    fn written_csv_reads_back() {
        let t = ingest_csv_from_bytes(
            b"date,state,age_0_5\n01-02-2025,Delhi,3\n,Bihar,\n",
            b',',
        )
        .unwrap();
        let mut out = Vec::new();
        write_csv(&t, &mut out).unwrap();
        let back = ingest_csv_from_bytes(&out, b',').unwrap();
        assert_eq!(back, t);
    }
}
