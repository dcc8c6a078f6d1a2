//! Seeded synthetic datasets matching the ingestion schema.
//!
//! Produces one enrolment, one demographic and one biometric table with one row per day and
//! district, so analysis code can be exercised without real extracts. Output depends only on
//! [`SyntheticConfig`].

use std::ops::Range;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::category::Category;
use crate::columns;
use crate::ingestion::DatasetMap;
use crate::types::{DataType, Field, Schema, Table, Value};

/// State → districts reference hierarchy.
pub const REGIONS: &[(&str, &[&str])] = &[
    ("Maharashtra", &["Pune", "Mumbai", "Nagpur"]),
    ("Karnataka", &["Bangalore", "Mysore"]),
    ("Delhi", &["New Delhi", "North Delhi"]),
    ("Uttar Pradesh", &["Lucknow", "Varanasi"]),
    ("Bihar", &["Patna", "Gaya"]),
];

const PINCODE_RANGE: Range<i64> = 110_001..800_001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub days: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticData {
    pub enrolment: Table,
    pub demographic: Table,
    pub biometric: Table,
}

impl SyntheticData {
    pub fn into_dataset_map(self) -> DatasetMap {
        let mut map = DatasetMap::new();
        map.merge(Category::Enrolment, self.enrolment);
        map.merge(Category::Demographic, self.demographic);
        map.merge(Category::Biometric, self.biometric);
        map
    }
}

const ENROLMENT_RANGES: &[(&str, Range<i64>)] = &[
    (columns::AGE_0_5, 50..200),
    (columns::AGE_5_17, 100..500),
    (columns::AGE_18_GREATER, 500..2000),
];
const DEMOGRAPHIC_RANGES: &[(&str, Range<i64>)] =
    &[(columns::DEMO_AGE_5_17, 10..50), (columns::DEMO_AGE_17, 20..100)];
const BIOMETRIC_RANGES: &[(&str, Range<i64>)] =
    &[(columns::BIO_AGE_5_17, 20..150), (columns::BIO_AGE_17, 50..300)];

/// Metric columns and their value ranges, per category.
fn metric_ranges(category: Category) -> &'static [(&'static str, Range<i64>)] {
    match category {
        Category::Enrolment => ENROLMENT_RANGES,
        Category::Demographic => DEMOGRAPHIC_RANGES,
        Category::Biometric => BIOMETRIC_RANGES,
        Category::Unknown => &[],
    }
}

fn schema_for(category: Category) -> Schema {
    let mut fields = vec![
        Field::new(columns::DATE, DataType::Date),
        Field::new(columns::STATE, DataType::Utf8),
        Field::new(columns::DISTRICT, DataType::Utf8),
        Field::new(columns::PINCODE, DataType::Int64),
    ];
    fields.extend(
        metric_ranges(category)
            .iter()
            .map(|(k, _)| Field::new(*k, DataType::Int64)),
    );
    Schema::new(fields)
}

/// Generate the three datasets.
pub fn generate(config: &SyntheticConfig) -> SyntheticData {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut enrolment = Table::new(schema_for(Category::Enrolment), Vec::new());
    let mut demographic = Table::new(schema_for(Category::Demographic), Vec::new());
    let mut biometric = Table::new(schema_for(Category::Biometric), Vec::new());

    for offset in 0..config.days {
        let date = config.start_date + Duration::days(i64::from(offset));
        for (state, districts) in REGIONS {
            for district in *districts {
                let base = [
                    Value::Date(date),
                    Value::Utf8((*state).to_owned()),
                    Value::Utf8((*district).to_owned()),
                    Value::Int64(rng.gen_range(PINCODE_RANGE)),
                ];
                for (category, table) in [
                    (Category::Enrolment, &mut enrolment),
                    (Category::Demographic, &mut demographic),
                    (Category::Biometric, &mut biometric),
                ] {
                    let mut row = base.to_vec();
                    for (_, range) in metric_ranges(category) {
                        row.push(Value::Int64(rng.gen_range(range.clone())));
                    }
                    table.rows.push(row);
                }
            }
        }
    }

    SyntheticData {
        enrolment,
        demographic,
        biometric,
    }
}
