//! Order management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[field(id, Text)]
    pub id: String,

    #[field(Text)]
    pub customer: String,

    #[field(Text)]
    #[serde(default)]
    pub email: String,

    /// `pending`, `processing`, `shipped`, `delivered` or `cancelled`.
    #[field(Enum)]
    pub status: String,

    #[field(Enum)]
    pub channel: String,

    #[field(Currency)]
    pub total: f64,

    #[field(Numeric, rename = "itemCount")]
    pub item_count: u32,

    #[field(Date, rename = "placedAt")]
    pub placed_at: DateTime<Utc>,
}

/// The order table: most recent first.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([Order::ID, Order::CUSTOMER, Order::EMAIL])
        .with_facets([Order::STATUS, Order::CHANNEL])
        .with_sentinels(Sentinels::new(["all", "All Statuses", "All Channels"]))
        .with_page_size(20)
        .with_default_sort(Order::PLACED_AT, Dir::Desc)
}
