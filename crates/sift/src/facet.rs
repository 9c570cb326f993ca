//! Per-option counts for filter controls.
//!
//! A facet for dimension `d` counts, for each distinct value of `d`, how many
//! records match every *other* active criterion. The pipeline decides which
//! records those are; this module only does the counting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::accessor::{display_text, normalize, Normalized};
use crate::filter::Operand;
use crate::record::{FieldRef, FieldType, Record};
use crate::value::Value;

/// One option of a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetBucket {
    /// Display form of the option, as first seen in the collection.
    pub value: String,
    /// Number of records carrying this option.
    pub count: usize,
    #[serde(skip)]
    key: Normalized,
}

impl FacetBucket {
    /// The normalized key this bucket groups by.
    pub fn key(&self) -> &Normalized {
        &self.key
    }
}

/// Counts for one facet dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// The dimension counted.
    pub dimension: String,
    /// Records matching every other criterion, i.e. the count behind an "all" option.
    pub total: usize,
    /// Options ordered by normalized key.
    pub buckets: Vec<FacetBucket>,
    #[serde(skip)]
    ty: FieldType,
}

impl Facet {
    /// Counts `field` over `records`.
    ///
    /// Each element of a collection field counts once per record; Missing
    /// values are not counted.
    pub fn count<'r, T, I>(dimension: impl Into<String>, field: &FieldRef, records: I) -> Facet
    where
        T: Record + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        let mut counts: BTreeMap<Normalized, (String, usize)> = BTreeMap::new();
        let mut total = 0;

        for record in records {
            total += 1;
            let raw = record.field_value(&field.name);
            let mut seen: Vec<Normalized> = Vec::new();
            for element in elements(&raw) {
                let key = normalize(element, field.ty);
                if key.is_missing() || seen.contains(&key) {
                    continue;
                }
                let Some(display) = display_text(element) else {
                    continue;
                };
                counts.entry(key.clone()).or_insert((display, 0)).1 += 1;
                seen.push(key);
            }
        }

        Facet {
            dimension: dimension.into(),
            total,
            buckets: counts
                .into_iter()
                .map(|(key, (value, count))| FacetBucket { value, count, key })
                .collect(),
            ty: field.ty,
        }
    }

    /// Count for one option, compared the way a filter would compare it.
    pub fn count_for(&self, value: impl Into<Operand>) -> usize {
        let operand = value.into();
        let key = normalize(&operand.as_value(), self.ty);
        self.buckets
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}

fn elements<'v, 'a>(value: &'v Value<'a>) -> Box<dyn Iterator<Item = &'v Value<'a>> + 'v> {
    match value {
        Value::List(items) => Box::new(items.iter()),
        Value::None => Box::new(std::iter::empty()),
        scalar => Box::new(std::iter::once(scalar)),
    }
}

/// Facets for every declared dimension, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetCounts(Vec<Facet>);

impl FacetCounts {
    /// Wraps computed facets.
    pub fn new(facets: Vec<Facet>) -> Self {
        FacetCounts(facets)
    }

    /// The facet for `dimension`, if declared.
    pub fn get(&self, dimension: &str) -> Option<&Facet> {
        self.0.iter().find(|f| f.dimension == dimension)
    }

    /// Iterates all facets.
    pub fn iter(&self) -> std::slice::Iter<'_, Facet> {
        self.0.iter()
    }

    /// Number of facets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no facets were declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FacetCounts {
    type Item = &'a Facet;
    type IntoIter = std::slice::Iter<'a, Facet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_distinct_normalized_values() {
        let records = vec![
            json!({"type": "Family"}),
            json!({"type": "family"}),
            json!({"type": "Individual"}),
            json!({"type": null}),
            json!({}),
        ];
        let facet = Facet::count("type", &FieldRef::enumeration("type"), &records);

        assert_eq!(facet.total, 5);
        assert_eq!(facet.buckets.len(), 2);
        // Display keeps the first spelling seen.
        assert_eq!(facet.buckets[0].value, "Family");
        assert_eq!(facet.buckets[0].count, 2);
        assert_eq!(facet.buckets[1].value, "Individual");
        assert_eq!(facet.count_for("FAMILY"), 2);
        assert_eq!(facet.count_for("group"), 0);
    }

    #[test]
    fn collection_elements_count_once_per_record() {
        let records = vec![
            json!({"languages": ["English", "Spanish", "english"]}),
            json!({"languages": ["English"]}),
        ];
        let facet = Facet::count("languages", &FieldRef::enumeration("languages"), &records);
        assert_eq!(facet.count_for("english"), 2);
        assert_eq!(facet.count_for("spanish"), 1);
    }

    #[test]
    fn numeric_buckets_order_numerically() {
        let records = vec![
            json!({"beds": 10}),
            json!({"beds": "2"}),
            json!({"beds": 3}),
            json!({"beds": 2}),
        ];
        let facet = Facet::count("beds", &FieldRef::numeric("beds"), &records);
        let values: Vec<&str> = facet.buckets.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["2", "3", "10"]);
        assert_eq!(facet.count_for(2), 2);
    }

    #[test]
    fn serializes_without_internal_keys() {
        let records = vec![json!({"status": "Open"})];
        let facets = FacetCounts::new(vec![Facet::count(
            "status",
            &FieldRef::enumeration("status"),
            &records,
        )]);
        assert_eq!(
            serde_json::to_value(&facets).unwrap(),
            json!([{"dimension": "status", "total": 1, "buckets": [{"value": "Open", "count": 1}]}])
        );
    }
}
