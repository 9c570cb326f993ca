//! The listing domains as one tagged type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sift::{Record, Schema, Schematic, Value, ViewConfig};
use thiserror::Error;

use crate::application::{self, InsuranceApplication};
use crate::doctor::{self, Doctor};
use crate::message::{self, Message};
use crate::order::{self, Order};
use crate::plan::{self, Plan};
use crate::property::{self, Property};

/// Errors raised by the catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("unknown listing kind '{0}'. Expected one of: plan, doctor, property, order, application, message")]
    UnknownKind(String),
}

/// Which listing screen a collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Plan,
    Doctor,
    Property,
    Order,
    Application,
    Message,
}

impl ListingKind {
    /// Every kind, in menu order.
    pub const ALL: [ListingKind; 6] = [
        ListingKind::Plan,
        ListingKind::Doctor,
        ListingKind::Property,
        ListingKind::Order,
        ListingKind::Application,
        ListingKind::Message,
    ];

    /// Returns the name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Plan => "plan",
            ListingKind::Doctor => "doctor",
            ListingKind::Property => "property",
            ListingKind::Order => "order",
            ListingKind::Application => "application",
            ListingKind::Message => "message",
        }
    }

    /// The record schema of this kind.
    pub fn schema(self) -> Schema {
        match self {
            ListingKind::Plan => Plan::schema(),
            ListingKind::Doctor => Doctor::schema(),
            ListingKind::Property => Property::schema(),
            ListingKind::Order => Order::schema(),
            ListingKind::Application => InsuranceApplication::schema(),
            ListingKind::Message => Message::schema(),
        }
    }

    /// The default view configuration of this kind's screen.
    pub fn view_config(self) -> ViewConfig {
        match self {
            ListingKind::Plan => plan::view_config(),
            ListingKind::Doctor => doctor::view_config(),
            ListingKind::Property => property::view_config(),
            ListingKind::Order => order::view_config(),
            ListingKind::Application => application::view_config(),
            ListingKind::Message => message::view_config(),
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" | "plans" => Ok(ListingKind::Plan),
            "doctor" | "doctors" => Ok(ListingKind::Doctor),
            "property" | "properties" => Ok(ListingKind::Property),
            "order" | "orders" => Ok(ListingKind::Order),
            "application" | "applications" => Ok(ListingKind::Application),
            "message" | "messages" => Ok(ListingKind::Message),
            _ => Err(CatalogError::UnknownKind(s.to_string())),
        }
    }
}

/// A record of any listing domain, tagged by `kind` on the wire:
///
/// ```json
/// {"kind": "order", "id": "A-1001", "customer": "Ada", ...}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing {
    Plan(Plan),
    Doctor(Doctor),
    Property(Property),
    Order(Order),
    Application(InsuranceApplication),
    Message(Message),
}

impl Listing {
    /// The domain this record belongs to.
    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Plan(_) => ListingKind::Plan,
            Listing::Doctor(_) => ListingKind::Doctor,
            Listing::Property(_) => ListingKind::Property,
            Listing::Order(_) => ListingKind::Order,
            Listing::Application(_) => ListingKind::Application,
            Listing::Message(_) => ListingKind::Message,
        }
    }
}

impl Record for Listing {
    fn field_value(&self, path: &str) -> Value<'_> {
        match self {
            Listing::Plan(r) => r.field_value(path),
            Listing::Doctor(r) => r.field_value(path),
            Listing::Property(r) => r.field_value(path),
            Listing::Order(r) => r.field_value(path),
            Listing::Application(r) => r.field_value(path),
            Listing::Message(r) => r.field_value(path),
        }
    }
}

macro_rules! listing_from {
    ($($variant:ident($t:ty)),*) => {
        $(
            impl From<$t> for Listing {
                fn from(record: $t) -> Self {
                    Listing::$variant(record)
                }
            }
        )*
    };
}

listing_from!(
    Plan(Plan),
    Doctor(Doctor),
    Property(Property),
    Order(Order),
    Application(InsuranceApplication),
    Message(Message)
);
