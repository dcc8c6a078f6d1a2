use enrolment_insights::category::Category;
use enrolment_insights::ingestion::csv::write_csv;
use enrolment_insights::ingestion::{IngestionOptions, SourceFile, ingest};
use enrolment_insights::synthetic::{SyntheticConfig, generate};
use enrolment_insights::views::{ViewData, ViewRequest, build_view, kpis};

#[test]
fn generated_tables_survive_a_csv_round_trip() {
    let data = generate(&SyntheticConfig {
        days: 5,
        ..Default::default()
    });

    let mut files = Vec::new();
    for (name, table) in [
        ("enrolment.csv", &data.enrolment),
        ("demographic.csv", &data.demographic),
        ("biometric.csv", &data.biometric),
    ] {
        let mut buf = Vec::new();
        write_csv(table, &mut buf).unwrap();
        files.push(SourceFile::new(name, buf));
    }

    let outcome = ingest(&files, &IngestionOptions::default());
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.datasets, data.clone().into_dataset_map());
    assert_eq!(outcome.datasets.get(Category::Biometric), Some(&data.biometric));
}

#[test]
fn overview_over_synthetic_data() {
    let datasets = generate(&SyntheticConfig::default()).into_dataset_map();

    let k = kpis(&datasets);
    assert_eq!(k.active_districts, 11);
    assert!(k.working_age > 0 && k.working_age < k.total_activity);

    let ViewData::Overview(data) = build_view(&datasets, &ViewRequest::default()) else {
        panic!("expected overview");
    };
    assert_eq!(data.enrolment_trend.unwrap().row_count(), 30);
    assert_eq!(data.child_saturation.unwrap().row_count(), 11);
}
