//! Insurance application review.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// An insurance application awaiting or past review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceApplication {
    #[field(id, Text)]
    pub id: String,

    #[field(Text)]
    pub applicant: String,

    #[field(Enum)]
    pub category: String,

    /// `submitted`, `in_review`, `approved`, `declined`.
    #[field(Enum)]
    pub status: String,

    #[field(Enum)]
    #[serde(default)]
    pub reviewer: Option<String>,

    #[field(Currency, rename = "coverageAmount")]
    pub coverage_amount: f64,

    #[field(Numeric, rename = "riskScore")]
    #[serde(default)]
    pub risk_score: Option<f64>,

    #[field(Date, rename = "submittedOn")]
    pub submitted_on: NaiveDate,
}

/// The review queue: oldest submissions first, so nothing waits too long.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([InsuranceApplication::APPLICANT, InsuranceApplication::ID])
        .with_facets([
            InsuranceApplication::CATEGORY,
            InsuranceApplication::STATUS,
            InsuranceApplication::REVIEWER,
        ])
        .with_sentinels(Sentinels::new(["all", "All Categories", "All Statuses"]))
        .with_page_size(15)
        .with_default_sort(InsuranceApplication::SUBMITTED_ON, Dir::Asc)
}
