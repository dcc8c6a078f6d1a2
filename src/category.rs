//! Dataset classification by column presence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns;

/// Dataset category of an ingested file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// New enrolments by age bucket.
    Enrolment,
    /// Demographic-update counts.
    Demographic,
    /// Biometric-update counts.
    Biometric,
    /// No defining column present.
    Unknown,
}

impl Category {
    /// Categories that can appear in a dataset map, in classification priority order.
    pub const KNOWN: [Category; 3] = [
        Category::Enrolment,
        Category::Demographic,
        Category::Biometric,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Enrolment => "enrolment",
            Category::Demographic => "demographic",
            Category::Biometric => "biometric",
            Category::Unknown => "unknown",
        }
    }

    /// Keys whose presence selects this category.
    pub fn defining_keys(self) -> &'static [&'static str] {
        match self {
            Category::Enrolment => &[columns::AGE_0_5, "age_0_to_5", "enrolment"],
            Category::Demographic => &[columns::DEMO_AGE_5_17, "demographic", "demo_update"],
            Category::Biometric => &[columns::BIO_AGE_5_17, "biometric", "bio_update"],
            Category::Unknown => &[],
        }
    }

    /// Known metric columns of this category.
    pub fn metric_keys(self) -> &'static [&'static str] {
        match self {
            Category::Enrolment => &[columns::AGE_0_5, columns::AGE_5_17, columns::AGE_18_GREATER],
            Category::Demographic => &[columns::DEMO_AGE_5_17, columns::DEMO_AGE_17],
            Category::Biometric => &[columns::BIO_AGE_5_17, columns::BIO_AGE_17],
            Category::Unknown => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrolment" => Ok(Category::Enrolment),
            "demographic" => Ok(Category::Demographic),
            "biometric" => Ok(Category::Biometric),
            "unknown" => Ok(Category::Unknown),
            other => Err(format!("unknown dataset category '{other}'")),
        }
    }
}

/// Classify a set of normalized column keys.
///
/// The first category (in [`Category::KNOWN`] order) with any defining key present wins. Only
/// names are inspected, so a header-only file classifies the same as a populated one.
pub fn classify<S: AsRef<str>>(columns: &[S]) -> Category {
    Category::KNOWN
        .into_iter()
        .find(|category| {
            columns
                .iter()
                .any(|c| category.defining_keys().contains(&c.as_ref()))
        })
        .unwrap_or(Category::Unknown)
}
