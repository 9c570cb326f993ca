//! Property dashboard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// A property managed from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[field(id)]
    pub id: String,

    #[field(Text)]
    pub address: String,

    #[field(Enum)]
    pub city: String,

    #[field(Enum, rename = "propertyType")]
    pub property_type: String,

    /// `available`, `pending`, `leased` or `sold`.
    #[field(Enum)]
    pub status: String,

    #[field(Currency)]
    pub price: f64,

    #[field(Numeric)]
    pub bedrooms: u32,

    #[field(Numeric)]
    pub bathrooms: f32,

    #[field(Numeric, rename = "squareFeet")]
    #[serde(default)]
    pub square_feet: Option<u32>,

    #[field(Date, rename = "listedOn")]
    pub listed_on: NaiveDate,
}

/// The dashboard view: newest listings first.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([Property::ADDRESS, Property::CITY])
        .with_facets([Property::PROPERTY_TYPE, Property::STATUS, Property::BEDROOMS])
        .with_sentinels(Sentinels::new(["all", "Any"]))
        .with_page_size(10)
        .with_default_sort(Property::LISTED_ON, Dir::Desc)
}
