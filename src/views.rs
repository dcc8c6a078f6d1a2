//! Per-view summary data for a dashboard front end.
//!
//! The front end passes the active [`View`] and [`RegionFilter`] explicitly; nothing here keeps
//! navigation state. [`build_view`] returns the grouped tables, totals and alerts the selected view
//! charts, and leaves rendering to the caller.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::columns;
use crate::ingestion::DatasetMap;
use crate::processing::{
    Alert, AnomalyReport, GroupedTable, ReduceOp, RegionFilter, aggregate, detect_anomalies, reduce,
    sum_metric,
};
use crate::types::{Table, Value};

/// Threshold used for district-level biometric spike alerts.
pub const DISTRICT_RISK_THRESHOLD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Overview,
    Demographics,
    Biometrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub view: View,
    pub region: RegionFilter,
}

/// Headline counters of the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// All enrolment age buckets.
    pub total_activity: i64,
    /// Biometric updates across both age buckets.
    pub biometric_updates: i64,
    /// Adult (18+) enrolments.
    pub working_age: i64,
    /// Distinct districts in the enrolment data.
    pub active_districts: i64,
}

/// A single named total, e.g. one slice of an age distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricTotal {
    pub metric: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewData {
    pub kpis: Kpis,
    /// Daily enrolment per age bucket.
    pub enrolment_trend: Option<GroupedTable>,
    /// District totals of `age_0_5`, largest first.
    pub child_saturation: Option<GroupedTable>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicsData {
    pub age_distribution: Vec<MetricTotal>,
    pub demographic_updates: Vec<MetricTotal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricsData {
    /// Daily `bio_age_5_17`.
    pub mandatory_update_trend: Option<GroupedTable>,
    /// District z-scores of `bio_age_17_`.
    pub district_risk: Option<AnomalyReport>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum ViewData {
    Overview(OverviewData),
    Demographics(DemographicsData),
    /// `None` when no biometric dataset was loaded.
    Biometrics(Option<BiometricsData>),
}

impl ViewData {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the data for `request.view`, after narrowing every dataset to `request.region`.
pub fn build_view(datasets: &DatasetMap, request: &ViewRequest) -> ViewData {
    let filtered = request.region.apply_all(datasets);
    match request.view {
        View::Overview => ViewData::Overview(overview(&filtered)),
        View::Demographics => ViewData::Demographics(demographics(&filtered)),
        View::Biometrics => ViewData::Biometrics(filtered.get(Category::Biometric).map(biometrics)),
    }
}

/// Headline counters; categories that are not loaded contribute zero.
pub fn kpis(datasets: &DatasetMap) -> Kpis {
    let mut kpis = Kpis::default();
    if let Some(e) = datasets.get(Category::Enrolment) {
        kpis.total_activity = Category::Enrolment
            .metric_keys()
            .iter()
            .map(|k| sum_metric(e, k))
            .fold(0, i64::saturating_add);
        kpis.working_age = sum_metric(e, columns::AGE_18_GREATER);
        kpis.active_districts = reduce(e, columns::DISTRICT, ReduceOp::CountDistinct)
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
    }
    if let Some(b) = datasets.get(Category::Biometric) {
        kpis.biometric_updates =
            sum_metric(b, columns::BIO_AGE_5_17).saturating_add(sum_metric(b, columns::BIO_AGE_17));
    }
    kpis
}

fn overview(datasets: &DatasetMap) -> OverviewData {
    let mut data = OverviewData {
        kpis: kpis(datasets),
        ..Default::default()
    };
    let Some(e) = datasets.get(Category::Enrolment) else {
        return data;
    };

    let present = present_metrics(e, Category::Enrolment);
    if !present.is_empty() {
        data.enrolment_trend = aggregate(e, &[columns::DATE], &present);
    }
    if e.schema.contains(columns::AGE_0_5) {
        data.child_saturation = aggregate(e, &[columns::DISTRICT], &[columns::AGE_0_5])
            .and_then(|g| g.sorted_by_metric_desc(columns::AGE_0_5));
    }
    data
}

fn demographics(datasets: &DatasetMap) -> DemographicsData {
    let totals = |category: Category| -> Vec<MetricTotal> {
        datasets
            .get(category)
            .map(|t| {
                present_metrics(t, category)
                    .into_iter()
                    .map(|k| MetricTotal {
                        metric: k.to_owned(),
                        total: sum_metric(t, k),
                    })
                    .collect()
            })
            .unwrap_or_default()
    };
    DemographicsData {
        age_distribution: totals(Category::Enrolment),
        demographic_updates: totals(Category::Demographic),
    }
}

fn biometrics(b: &Table) -> BiometricsData {
    let mandatory_update_trend = if b.schema.contains(columns::BIO_AGE_5_17) {
        aggregate(b, &[columns::DATE], &[columns::BIO_AGE_5_17])
    } else {
        None
    };
    let district_risk = if b.schema.contains(columns::BIO_AGE_17) {
        aggregate(b, &[columns::DISTRICT], &[columns::BIO_AGE_17])
            .and_then(|g| detect_anomalies(&g, columns::BIO_AGE_17, DISTRICT_RISK_THRESHOLD))
    } else {
        None
    };
    let alerts = district_risk.as_ref().map(AnomalyReport::alerts).unwrap_or_default();
    BiometricsData {
        mandatory_update_trend,
        district_risk,
        alerts,
    }
}

/// Known metric columns of `category` that `table` actually has.
fn present_metrics(table: &Table, category: Category) -> Vec<&'static str> {
    category
        .metric_keys()
        .iter()
        .copied()
        .filter(|k| table.schema.contains(k))
        .collect()
}

/// Row count and distinct regions of every loaded dataset, for a status line.
pub fn dataset_summary(datasets: &DatasetMap) -> Vec<(Category, usize, usize)> {
    datasets
        .iter()
        .map(|(c, t)| {
            let states = reduce(t, columns::STATE, ReduceOp::CountDistinct)
                .as_ref()
                .and_then(Value::as_i64)
                .unwrap_or(0) as usize;
            (c, t.row_count(), states)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{IngestionOptions, SourceFile, ingest};
    use crate::processing::region_options;

    fn datasets() -> DatasetMap {
        let files = vec![
            SourceFile::new(
                "enrol.csv",
                "date,state,district,age_0_5,age_5_17,age_18_greater\n\
                 01-01-2025,Bihar,Patna,5,10,100\n\
                 01-01-2025,Bihar,Gaya,7,1,50\n\
                 02-01-2025,Delhi,New Delhi,2,2,20\n",
            ),
            SourceFile::new(
                "bio.csv",
                "date,state,district,bio_age_5_17,bio_age_17_\n\
                 01-01-2025,Bihar,Patna,3,30\n\
                 02-01-2025,Delhi,New Delhi,4,40\n",
            ),
        ];
        ingest(&files, &IngestionOptions::default()).datasets
    }

    #[test]
    fn overview_kpis_and_series() {
        let ViewData::Overview(data) = build_view(&datasets(), &ViewRequest::default()) else {
            panic!("expected overview");
        };
        assert_eq!(
            data.kpis,
            Kpis {
                total_activity: 197,
                biometric_updates: 77,
                working_age: 170,
                active_districts: 3,
            }
        );
        let trend = data.enrolment_trend.unwrap();
        assert_eq!(trend.metric_keys, vec!["age_0_5", "age_5_17", "age_18_greater"]);
        assert_eq!(trend.rows[0].sums, vec![12, 11, 150]);

        let saturation = data.child_saturation.unwrap();
        assert_eq!(saturation.rows[0].label(), "Gaya");
    }

    #[test]
    fn region_filter_narrows_every_dataset() {
        let request = ViewRequest {
            view: View::Overview,
            region: RegionFilter::State("Delhi".into()),
        };
        let ViewData::Overview(data) = build_view(&datasets(), &request) else {
            panic!("expected overview");
        };
        assert_eq!(data.kpis.total_activity, 24);
        assert_eq!(data.kpis.biometric_updates, 44);
        assert_eq!(data.kpis.active_districts, 1);
    }

    #[test]
    fn demographics_lists_present_buckets_only() {
        let request = ViewRequest {
            view: View::Demographics,
            ..Default::default()
        };
        let ViewData::Demographics(data) = build_view(&datasets(), &request) else {
            panic!("expected demographics");
        };
        assert_eq!(data.age_distribution.len(), 3);
        assert_eq!(data.age_distribution[2].total, 170);
        assert!(data.demographic_updates.is_empty());
    }

    #[test]
    fn biometrics_without_dataset_is_none() {
        let request = ViewRequest {
            view: View::Biometrics,
            ..Default::default()
        };
        assert_eq!(build_view(&DatasetMap::new(), &request), ViewData::Biometrics(None));
    }

    #[test]
    fn view_request_deserializes_from_json() {
        let request: ViewRequest =
            serde_json::from_str(r#"{"view":"biometrics","region":{"state":"Bihar"}}"#).unwrap();
        assert_eq!(request.view, View::Biometrics);
        assert_eq!(request.region, RegionFilter::State("Bihar".into()));

        let all: ViewRequest = serde_json::from_str(r#"{"region":"all"}"#).unwrap();
        assert_eq!(all.region, RegionFilter::All);
    }

    #[test]
    fn region_selector_lists_states_once() {
        assert_eq!(region_options(&datasets()), vec!["Bihar", "Delhi"]);
    }

    #[test]
    fn summary_counts_rows_and_states() {
        assert_eq!(
            dataset_summary(&datasets()),
            vec![(Category::Enrolment, 3, 2), (Category::Biometric, 2, 2)]
        );
    }
}
