//! Plan marketplace.

use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// A health plan offered on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[field(id)]
    pub id: String,

    #[field(Text)]
    pub name: String,

    #[field(Text)]
    #[serde(default)]
    pub description: String,

    #[field(Enum)]
    pub carrier: String,

    /// `individual` or `family`.
    #[field(Enum, rename = "type")]
    #[serde(rename = "type")]
    pub plan_type: String,

    #[field(Enum)]
    pub metal: String,

    #[field(Currency, rename = "monthlyPremium")]
    pub monthly_premium: f64,

    #[field(Currency)]
    pub deductible: f64,

    #[field(Numeric)]
    #[serde(default)]
    pub rating: Option<f64>,
}

/// The marketplace view: cheapest first, nine cards per page.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([Plan::NAME, Plan::DESCRIPTION, Plan::CARRIER])
        .with_facets([Plan::TYPE, Plan::METAL, Plan::CARRIER])
        .with_sentinels(Sentinels::new(["all", "All Plans", "All Carriers"]))
        .with_page_size(9)
        .with_default_sort(Plan::MONTHLY_PREMIUM, Dir::Asc)
}
