//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates a record's field accessor, its schema, and field
//! name constants from `#[field(...)]` annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
