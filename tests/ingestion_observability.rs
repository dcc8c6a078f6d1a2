use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use enrolment_insights::IngestionError;
use enrolment_insights::category::Category;
use enrolment_insights::ingestion::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionOptions, IngestionSeverity,
    IngestionStats, LogObserver, SourceFile, ingest, ingest_paths,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(String, Category, usize)>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.successes
            .lock()
            .unwrap()
            .push((ctx.file_name.clone(), stats.category, stats.rows));
    }

    fn on_failure(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &IngestionContext, severity: IngestionSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn fixture(name: &str) -> SourceFile {
    SourceFile::from_path(format!("tests/fixtures/{name}")).unwrap()
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    };

    let _ = ingest(&[fixture("biometric.csv")], &opts);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![("biometric.csv".to_string(), Category::Biometric, 3)]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    // Missing file -> Io error -> Critical
    let _ = ingest_paths(&["tests/fixtures/does_not_exist.csv"], &opts);

    let failures = obs.failures.lock().unwrap().clone();
    let alerts = obs.alerts.lock().unwrap().clone();
    assert_eq!(failures, vec![IngestionSeverity::Critical]);
    assert_eq!(alerts, vec![IngestionSeverity::Critical]);
}

#[test]
fn skipped_files_do_not_alert_below_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    };

    let files = vec![
        fixture("empty.csv"),
        fixture("unknown.csv"),
        SourceFile::new("dup.csv", "age_0_5,AGE 0 5\n1,2\n"),
    ];
    let _ = ingest(&files, &opts);

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(
        failures,
        vec![
            IngestionSeverity::Warning,
            IngestionSeverity::Warning,
            IngestionSeverity::Error
        ]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_warnings() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: IngestionSeverity::Warning,
        ..Default::default()
    };

    let _ = ingest(&[fixture("empty.csv")], &opts);

    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Warning]);
}

#[test]
fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        observer: Some(Arc::new(CompositeObserver::new(vec![
            a.clone() as Arc<dyn IngestionObserver>,
            Arc::new(LogObserver),
            b.clone(),
        ]))),
        ..Default::default()
    };

    let _ = ingest(&[fixture("unknown.csv")], &opts);

    assert_eq!(a.failures.lock().unwrap().len(), 1);
    assert_eq!(b.failures.lock().unwrap().len(), 1);
}

#[test]
fn file_observer_appends_lines() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let path = std::env::temp_dir().join(format!(
        "enrolment_insights_observer_{}_{nanos}.log",
        std::process::id()
    ));
    let opts = IngestionOptions {
        observer: Some(Arc::new(FileObserver::new(&path))),
        alert_at_or_above: IngestionSeverity::Warning,
        ..Default::default()
    };

    let _ = ingest(&[fixture("demographic.csv"), fixture("empty.csv")], &opts);

    let log = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("ok file=demographic.csv category=demographic rows=2"));
    assert!(lines[1].contains("skip severity=Warning file=empty.csv"));
    assert!(lines[2].contains("ALERT"));

    let _ = std::fs::remove_file(&path);
}
