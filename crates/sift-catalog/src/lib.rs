//! Record schemas for the listing screens.
//!
//! Each listing domain declares its record type once, with
//! `#[derive(Record)]`, together with the view configuration its screen
//! opens with: which fields search looks at, which filters show counts, how
//! the catch-all option is spelled, and the initial sort.
//!
//! | Kind | Record | Catch-all options |
//! |------|--------|-------------------|
//! | `plan` | [`Plan`] | `All Plans`, `All Carriers` |
//! | `doctor` | [`Doctor`] | `All Specialties`, `All Languages`, `Any City` |
//! | `property` | [`Property`] | `Any` |
//! | `order` | [`Order`] | `All Statuses`, `All Channels` |
//! | `application` | [`InsuranceApplication`] | `All Categories`, `All Statuses` |
//! | `message` | [`Message`] | `All Messages`, `All Folders` |
//!
//! `all` is a catch-all on every screen.
//!
//! # Example
//!
//! ```rust
//! use sift::{Constraint, ViewState};
//! use sift_catalog::{plan, Plan};
//!
//! let plans: Vec<Plan> = serde_json::from_str(r#"[
//!     {"id": "p1", "name": "Gold PPO", "carrier": "Acme", "type": "family",
//!      "metal": "gold", "monthlyPremium": 480, "deductible": 500},
//!     {"id": "p2", "name": "Bronze HMO", "carrier": "Acme", "type": "individual",
//!      "metal": "bronze", "monthlyPremium": 150, "deductible": 6000}
//! ]"#)?;
//!
//! let mut view = ViewState::from_records(plans, &plan::view_config())?;
//! view.set_filter(Plan::TYPE, Constraint::equals("All Plans"))?;
//! assert_eq!(view.visible_ids(), vec!["p2", "p1"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod doctor;
pub mod listing;
pub mod message;
pub mod order;
pub mod plan;
pub mod property;

pub use application::InsuranceApplication;
pub use doctor::Doctor;
pub use listing::{CatalogError, Listing, ListingKind};
pub use message::Message;
pub use order::Order;
pub use plan::Plan;
pub use property::Property;
