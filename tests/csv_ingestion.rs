use chrono::NaiveDate;
use enrolment_insights::IngestionError;
use enrolment_insights::ingestion::csv::{ingest_csv_from_bytes, ingest_csv_from_path, ingest_csv_from_reader};
use enrolment_insights::types::{DataType, Value};

fn ymd(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let t = ingest_csv_from_path("tests/fixtures/enrolment.csv", b',').unwrap();

    assert_eq!(
        t.schema.field_names().collect::<Vec<_>>(),
        vec!["date", "state", "district", "pincode", "age_0_5", "age_5_17", "age_18_greater"]
    );
    assert_eq!(t.row_count(), 3);
    assert_eq!(
        t.rows[0],
        vec![
            ymd(2025, 3, 1),
            Value::Utf8("Maharashtra".to_string()),
            Value::Utf8("Pune".to_string()),
            Value::Int64(411001),
            Value::Int64(12),
            Value::Int64(40),
            Value::Int64(210),
        ]
    );
}

#[test]
fn unparsable_count_becomes_null() {
    let t = ingest_csv_from_path("tests/fixtures/enrolment.csv", b',').unwrap();
    assert_eq!(t.value(2, "age_5_17"), Some(&Value::Null));
    assert_eq!(t.value(2, "age_18_greater"), Some(&Value::Int64(95)));
}

#[test]
fn free_text_columns_stay_text() {
    let t = ingest_csv_from_path("tests/fixtures/enrolment_late.csv", b',').unwrap();
    let remarks = t.schema.index_of("remarks").unwrap();
    assert_eq!(t.schema.fields[remarks].data_type, DataType::Utf8);
    assert_eq!(t.rows[0][remarks], Value::Utf8("late upload".to_string()));
}

#[test]
fn ingest_csv_honours_delimiter() {
    let input = "Date;State;District;bio_age_5_17\n01-03-2025;Delhi;New Delhi;4\n";
    let t = ingest_csv_from_bytes(input.as_bytes(), b';').unwrap();
    assert_eq!(t.value(0, "district"), Some(&Value::Utf8("New Delhi".to_string())));
    assert_eq!(t.value(0, "bio_age_5_17"), Some(&Value::Int64(4)));
}

#[test]
fn ingest_csv_from_reader_normalizes_headers() {
    let input = "  DATE ,Age--0  5\n2025-03-01,7\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let t = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(t.schema.field_names().collect::<Vec<_>>(), vec!["date", "age_0_5"]);
    assert_eq!(t.rows[0], vec![ymd(2025, 3, 1), Value::Int64(7)]);
}

#[test]
fn empty_file_is_rejected() {
    let err = ingest_csv_from_path("tests/fixtures/empty.csv", b',').unwrap_err();
    assert!(matches!(err, IngestionError::EmptyFile));

    let err = ingest_csv_from_bytes(b" \n\t\n", b',').unwrap_err();
    assert_eq!(err.to_string(), "file is empty");
}

#[test]
fn duplicate_normalized_headers_are_rejected() {
    let err = ingest_csv_from_bytes(b"Age 0-5,age_0_5\n1,2\n", b',').unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("duplicate column 'age_0_5'"));
}

#[test]
fn missing_file_is_io_error() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv", b',').unwrap_err();
    assert!(matches!(err, IngestionError::Io(_)));
}
