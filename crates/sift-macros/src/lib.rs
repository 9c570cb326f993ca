//! Proc macros for sift.
//!
//! # Derive Macros
//!
//! - [`Record`] - Declare a record's field table and generate its accessor

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` and `Schematic` traits for listing records.
///
/// Each annotated field becomes a queryable field of the record schema.
/// Unannotated fields are invisible to queries.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `id` | The record's unique identifier (exactly one field) |
/// | `Text` | Free text, compared case-insensitively |
/// | `Numeric` | A number, or a string holding one |
/// | `Currency` | A money amount such as `"$1,250.00"` |
/// | `Enum` | One of a fixed set of options (`ty = "enum"` also works) |
/// | `Date` | A date, datetime, or epoch milliseconds |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom name in queries |
///
/// Field types must implement `sift::AsValue`; `Option<T>` and `Vec<T>`
/// (collection fields) are supported for any such `T`.
///
/// # Generated Code
///
/// 1. A `&'static str` constant per field, named in SCREAMING_SNAKE_CASE
/// 2. `Record::field_value()`
/// 3. `Schematic::schema()`
///
/// # Example
///
/// ```ignore
/// use sift::{Query, Record, Schematic};
///
/// #[derive(Record)]
/// struct Doctor {
///     #[field(id)]
///     npi: String,
///
///     #[field(Text)]
///     name: String,
///
///     #[field(Enum)]
///     specialty: String,
///
///     #[field(Enum)]
///     languages: Vec<String>,
///
///     #[field(Numeric, rename = "yearsExperience")]
///     years_experience: u32,
/// }
///
/// let query = Query::new()
///     .equals(Doctor::SPECIALTY, "cardiology")
///     .contains_any(Doctor::LANGUAGES, ["spanish"])
///     .build();
///
/// let schema = Doctor::schema();
/// ```
#[proc_macro_derive(Record, attributes(field))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
