//! Z-score outlier detection over grouped metrics.
//!
//! Each group's value is standardized against the mean and sample standard deviation (`n - 1`
//! denominator) of all groups. With fewer than two groups, or no spread at all, every score is 0
//! and nothing is flagged.

use serde::{Deserialize, Serialize};

use crate::types::Value;

use super::aggregate::{GroupedRow, GroupedTable};

/// Default z-score threshold.
pub const DEFAULT_Z_SCORE_THRESHOLD: f64 = 2.0;

/// Which side of the distribution counts as anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tail {
    /// `z > threshold`: only unusually high values (spikes).
    #[default]
    Upper,
    /// `|z| > threshold`: unusually high or low values.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyOptions {
    pub threshold: f64,
    pub tail: Tail,
}

impl Default for AnomalyOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_Z_SCORE_THRESHOLD,
            tail: Tail::Upper,
        }
    }
}

/// A grouped row with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRow {
    #[serde(flatten)]
    pub row: GroupedRow,
    pub z_score: f64,
    pub is_anomaly: bool,
}

/// One flagged group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub keys: Vec<Value>,
    pub label: String,
    pub z_score: f64,
}

/// A [`GroupedTable`] augmented with z-scores and anomaly flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub group_keys: Vec<String>,
    pub metric_keys: Vec<String>,
    /// Metric the scores were computed on.
    pub metric_key: String,
    pub mean: f64,
    /// Sample standard deviation; `None` when degenerate (fewer than two rows, zero spread).
    pub std_dev: Option<f64>,
    pub threshold: f64,
    pub tail: Tail,
    pub rows: Vec<ScoredRow>,
}

impl AnomalyReport {
    /// Flagged groups, highest z-score first.
    pub fn alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .rows
            .iter()
            .filter(|r| r.is_anomaly)
            .map(|r| Alert {
                keys: r.row.keys.clone(),
                label: r.row.label(),
                z_score: r.z_score,
            })
            .collect();
        alerts.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));
        alerts
    }

    pub fn anomaly_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_anomaly).count()
    }
}

/// Score `metric_key` with the one-sided test `z > threshold`.
///
/// Returns `None` when `grouped` is empty or does not carry `metric_key`.
pub fn detect_anomalies(grouped: &GroupedTable, metric_key: &str, threshold: f64) -> Option<AnomalyReport> {
    detect_anomalies_with(
        grouped,
        metric_key,
        &AnomalyOptions {
            threshold,
            tail: Tail::Upper,
        },
    )
}

/// Score `metric_key` using explicit [`AnomalyOptions`].
pub fn detect_anomalies_with(
    grouped: &GroupedTable,
    metric_key: &str,
    options: &AnomalyOptions,
) -> Option<AnomalyReport> {
    if grouped.is_empty() {
        return None;
    }
    let values: Vec<f64> = grouped
        .metric_values(metric_key)?
        .into_iter()
        .map(|v| v as f64)
        .collect();

    let mean = mean(&values);
    let std_dev = sample_std_dev(&values, mean).filter(|s| s.is_finite() && *s > 0.0);

    let rows = grouped
        .rows
        .iter()
        .zip(&values)
        .map(|(row, &v)| {
            let z_score = std_dev.map_or(0.0, |s| (v - mean) / s);
            let is_anomaly = std_dev.is_some()
                && match options.tail {
                    Tail::Upper => z_score > options.threshold,
                    Tail::Both => z_score.abs() > options.threshold,
                };
            ScoredRow {
                row: row.clone(),
                z_score,
                is_anomaly,
            }
        })
        .collect();

    Some(AnomalyReport {
        group_keys: grouped.group_keys.clone(),
        metric_keys: grouped.metric_keys.clone(),
        metric_key: metric_key.to_owned(),
        mean,
        std_dev,
        threshold: options.threshold,
        tail: options.tail,
        rows,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
