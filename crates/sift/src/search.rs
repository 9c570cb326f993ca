//! Free-text search over a list of fields.

use serde::{Deserialize, Serialize};

use crate::accessor::search_text;
use crate::record::{FieldRef, Record};
use crate::value::Value;

/// Free-text query plus the fields it may match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    /// The text typed by the user. Blank means no constraint.
    #[serde(default)]
    pub text: String,
    /// Fields eligible for substring matching, in priority order.
    #[serde(default)]
    pub fields: Vec<FieldRef>,
}

impl SearchSpec {
    /// Creates a search over `fields`.
    pub fn new(text: impl Into<String>, fields: impl IntoIterator<Item = FieldRef>) -> Self {
        SearchSpec {
            text: text.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Returns `true` if the search text is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Compiled search predicate.
///
/// A record matches when the trimmed, lowercased query is a substring of the
/// lowercased display form of any listed field. Missing fields are skipped.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    needle: Option<String>,
    fields: Vec<FieldRef>,
}

impl SearchMatcher {
    /// Compiles a search spec.
    pub fn compile(spec: &SearchSpec) -> Self {
        let needle = spec.text.trim();
        SearchMatcher {
            needle: (!needle.is_empty()).then(|| needle.to_lowercase()),
            fields: spec.fields.clone(),
        }
    }

    /// Returns `true` if this matcher accepts every record.
    pub fn is_trivial(&self) -> bool {
        self.needle.is_none()
    }

    /// Tests a single record.
    pub fn matches<T: Record + ?Sized>(&self, record: &T) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        self.fields
            .iter()
            .any(|field| contains(&record.field_value(&field.name), needle))
    }
}

fn contains(value: &Value<'_>, needle: &str) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| contains(item, needle)),
        scalar => search_text(scalar).is_some_and(|text| text.contains(needle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<FieldRef> {
        vec![FieldRef::text("name"), FieldRef::text("description")]
    }

    #[test]
    fn blank_text_matches_everything() {
        for text in ["", "   ", "\t\n"] {
            let matcher = SearchMatcher::compile(&SearchSpec::new(text, fields()));
            assert!(matcher.is_trivial());
            assert!(matcher.matches(&json!({})));
        }
    }

    #[test]
    fn case_insensitive_substring_across_fields() {
        let matcher = SearchMatcher::compile(&SearchSpec::new("  GOLD ", fields()));
        assert!(matcher.matches(&json!({"name": "Gold PPO"})));
        assert!(matcher.matches(&json!({"name": "Basic", "description": "Marigold network"})));
        assert!(!matcher.matches(&json!({"name": "Silver", "description": "Low deductible"})));
    }

    #[test]
    fn missing_fields_are_skipped() {
        let matcher = SearchMatcher::compile(&SearchSpec::new("gold", fields()));
        assert!(matcher.matches(&json!({"description": "gold tier"})));
        assert!(!matcher.matches(&json!({"other": "gold"})));
    }

    #[test]
    fn searches_formatted_and_collection_values() {
        let spec = SearchSpec::new(
            "1,250",
            [FieldRef::currency("premium"), FieldRef::enumeration("tags")],
        );
        let matcher = SearchMatcher::compile(&spec);
        assert!(matcher.matches(&json!({"premium": "$1,250.00"})));

        let spec = SearchSpec::new("spanish", [FieldRef::enumeration("languages")]);
        let matcher = SearchMatcher::compile(&spec);
        assert!(matcher.matches(&json!({"languages": ["English", "Spanish"]})));
        assert!(!matcher.matches(&json!({"languages": ["English"]})));
    }

    #[test]
    fn numbers_are_searchable_by_their_display_form() {
        let spec = SearchSpec::new("42", [FieldRef::numeric("units")]);
        let matcher = SearchMatcher::compile(&spec);
        assert!(matcher.matches(&json!({"units": 1420})));
        assert!(!matcher.matches(&json!({"units": 7})));
    }
}
