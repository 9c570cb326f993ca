//! Sift - filter, search, sort and paginate in-memory record collections.
//!
//! Sift derives the visible page of a listing view (a plan marketplace, a
//! doctor directory, an order table) from a collection that has already been
//! fetched and a query the user has built up through the view's controls.
//! It supports:
//!
//! - Typed fields: text, numeric, currency, enum and date, with formatted
//!   strings such as `"$1,250.00"` or `"03/14/2024"` normalized on read
//! - Filter operators: equals, in-range, contains-any, and a configurable
//!   catch-all sentinel (`"all"`, `"All Categories"`) that is always a no-op
//! - Case-insensitive substring search over a list of fields
//! - A stable sort that keeps missing values last in both directions
//! - Page clamping, so a shrinking result never strands the view past its end
//! - Facet counts per filter dimension, excluding that dimension's own filter
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sift::{FieldRef, Pipeline, Query, Schema};
//!
//! let schema = Schema::new("id", [
//!     FieldRef::text("name"),
//!     FieldRef::enumeration("type"),
//!     FieldRef::currency("monthlyPremium"),
//! ]);
//!
//! let plans = vec![
//!     json!({"id": 1, "name": "Gold PPO", "type": "family", "monthlyPremium": "$480"}),
//!     json!({"id": 2, "name": "Bronze HMO", "type": "individual", "monthlyPremium": "$150"}),
//!     json!({"id": 3, "name": "Silver PPO", "type": "family", "monthlyPremium": "$320"}),
//! ];
//!
//! let query = Query::new()
//!     .equals("type", "family")
//!     .order_asc(FieldRef::currency("monthlyPremium"))
//!     .build();
//!
//! let result = Pipeline::new(schema).recompute(&plans, &query)?;
//! assert_eq!(result.match_count, 2);
//! assert_eq!(result.records(&plans)[0]["name"], "Silver PPO");
//! # Ok::<(), sift::QueryError>(())
//! ```
//!
//! # Pipeline Order
//!
//! ```text
//! filter -> search -> count -> sort -> clamp page -> slice
//!                  \-> facets (each without its own dimension's filter)
//! ```
//!
//! Every spec is compiled up front. A malformed spec (unknown dimension,
//! a range over a text field, a bound that does not parse) fails the whole
//! recompute with a [`QueryError`]; [`ViewState`] then keeps its previous
//! result.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | text | `equals`, `contains-any`, `all` |
//! | enum | `equals`, `contains-any`, `all` |
//! | numeric | `equals`, `in-range`, `contains-any`, `all` |
//! | currency | `equals`, `in-range`, `contains-any`, `all` |
//! | date | `equals`, `in-range`, `contains-any`, `all` |
//!
//! # Typed Records
//!
//! Structs declare their field table once with `#[derive(Record)]`:
//!
//! ```rust,ignore
//! use sift::Record;
//!
//! #[derive(Record)]
//! struct Plan {
//!     #[field(id)]
//!     id: String,
//!     #[field(Text)]
//!     name: String,
//!     #[field(Enum, rename = "type")]
//!     kind: String,
//!     #[field(Currency, rename = "monthlyPremium")]
//!     monthly_premium: f64,
//! }
//! ```

mod accessor;
mod config;
mod error;
mod facet;
mod filter;
mod ordering;
mod page;
mod pipeline;
mod query;
mod record;
mod search;
mod value;
mod view;

// Re-export public API
pub use accessor::{
    display_text, normalize, parse_date, parse_numeric, resolve, search_text, Normalized,
};
pub use config::{DefaultSort, ViewConfig};
pub use error::{ConfigError, QueryError, Result};
pub use facet::{Facet, FacetBucket, FacetCounts};
pub use filter::{
    CompiledFilter, Constraint, FilterOp, FilterSpec, Operand, PredicateCompiler, RawFilterSpec,
    Sentinels,
};
pub use ordering::{compare_keys, Comparator, Dir, SortSpec};
pub use page::{PageSpec, DEFAULT_PAGE_SIZE};
pub use pipeline::{Pipeline, ViewResult};
pub use query::Query;
pub use record::{AsValue, FieldRef, FieldType, Record, Schema, Schematic};
pub use search::{SearchMatcher, SearchSpec};
pub use value::{Number, Timestamp, Value};
pub use view::ViewState;

// Record derive macro
pub use sift_macros::Record;
