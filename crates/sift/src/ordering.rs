//! Sort direction, sort specs, and the record comparator.
//!
//! The comparator is a total order with two fixed policies:
//!
//! - Missing values sort after every present value, in both directions, so
//!   flipping the direction never brings blank rows to the top.
//! - Equal values fall back to the original collection index, ascending, in
//!   both directions. Sorting is therefore stable regardless of the
//!   underlying algorithm.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::accessor::{resolve, Normalized};
use crate::record::{FieldRef, Record};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Asc,
    /// Descending order (largest first).
    #[serde(rename = "desc", alias = "descending")]
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// The opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Parses `asc`/`ascending` or `desc`/`descending`.
    pub fn parse(s: &str) -> Option<Dir> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Dir::Asc),
            "desc" | "descending" => Some(Dir::Desc),
            _ => None,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single active sort of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: FieldRef,
    /// The sort direction.
    #[serde(rename = "direction", default)]
    pub dir: Dir,
}

impl SortSpec {
    /// Creates a new sort spec.
    pub fn new(field: FieldRef, dir: Dir) -> Self {
        SortSpec { field, dir }
    }

    /// Creates an ascending sort on `field`.
    pub fn asc(field: FieldRef) -> Self {
        SortSpec::new(field, Dir::Asc)
    }

    /// Creates a descending sort on `field`.
    pub fn desc(field: FieldRef) -> Self {
        SortSpec::new(field, Dir::Desc)
    }
}

/// Compares two normalized sort keys under `dir`, Missing last.
pub fn compare_keys(a: &Normalized, b: &Normalized, dir: Dir) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => dir.apply(a.total_cmp(b)),
    }
}

/// Total order over records, compiled from an optional [`SortSpec`].
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    sort: Option<SortSpec>,
}

impl Comparator {
    /// Compiles a comparator. `None` keeps input order.
    pub fn compile(sort: Option<&SortSpec>) -> Self {
        Comparator {
            sort: sort.cloned(),
        }
    }

    /// Compares two records given their positions in the original collection.
    pub fn compare<T: Record + ?Sized>(
        &self,
        a: &T,
        a_index: usize,
        b: &T,
        b_index: usize,
    ) -> Ordering {
        let by_key = match &self.sort {
            Some(sort) => {
                compare_keys(&resolve(a, &sort.field), &resolve(b, &sort.field), sort.dir)
            }
            None => Ordering::Equal,
        };
        by_key.then(a_index.cmp(&b_index))
    }

    /// Sorts collection indices in place.
    ///
    /// Each key is resolved once, up front, rather than on every comparison.
    pub fn sort<T: Record>(&self, collection: &[T], indices: &mut Vec<usize>) {
        let Some(sort) = &self.sort else {
            indices.sort_unstable();
            return;
        };

        let mut keyed: Vec<(Normalized, usize)> = indices
            .iter()
            .map(|&i| (resolve(&collection[i], &sort.field), i))
            .collect();
        keyed.sort_by(|(ka, ia), (kb, ib)| compare_keys(ka, kb, sort.dir).then(ia.cmp(ib)));

        indices.clear();
        indices.extend(keyed.into_iter().map(|(_, i)| i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sorted(records: &[serde_json::Value], sort: Option<&SortSpec>) -> Vec<i64> {
        let mut indices: Vec<usize> = (0..records.len()).collect();
        Comparator::compile(sort).sort(records, &mut indices);
        indices
            .into_iter()
            .map(|i| records[i]["id"].as_i64().unwrap())
            .collect()
    }

    fn records() -> Vec<serde_json::Value> {
        vec![
            json!({"id": 1, "premium": "$300"}),
            json!({"id": 2}),
            json!({"id": 3, "premium": 150}),
            json!({"id": 4, "premium": "300.00"}),
            json!({"id": 5, "premium": "n/a"}),
            json!({"id": 6, "premium": "$620"}),
        ]
    }

    #[test]
    fn dir_apply_and_flip() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Asc.flip(), Dir::Desc);
        assert_eq!(Dir::Desc.flip(), Dir::Asc);
    }

    #[test]
    fn dir_parse_and_display() {
        assert_eq!(Dir::parse("DESC"), Some(Dir::Desc));
        assert_eq!(Dir::parse("ascending"), Some(Dir::Asc));
        assert_eq!(Dir::parse("up"), None);
        assert_eq!(Dir::Asc.to_string(), "asc");
    }

    #[test]
    fn dir_serializes_as_it_displays() {
        for dir in [Dir::Asc, Dir::Desc] {
            assert_eq!(serde_json::to_value(dir).unwrap(), dir.to_string());
        }
        assert_eq!(serde_json::from_str::<Dir>("\"descending\"").unwrap(), Dir::Desc);
        assert_eq!(serde_json::from_str::<Dir>("\"asc\"").unwrap(), Dir::Asc);
    }

    #[test]
    fn no_sort_keeps_input_order() {
        assert_eq!(sorted(&records(), None), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn ascending_with_missing_last_and_stable_ties() {
        let sort = SortSpec::asc(FieldRef::currency("premium"));
        assert_eq!(sorted(&records(), Some(&sort)), vec![3, 1, 4, 6, 2, 5]);
    }

    #[test]
    fn descending_keeps_missing_last_and_ties_in_input_order() {
        let sort = SortSpec::desc(FieldRef::currency("premium"));
        assert_eq!(sorted(&records(), Some(&sort)), vec![6, 1, 4, 3, 2, 5]);
    }

    #[test]
    fn compare_breaks_ties_by_index() {
        let records = records();
        let cmp = Comparator::compile(Some(&SortSpec::desc(FieldRef::currency("premium"))));
        assert_eq!(cmp.compare(&records[0], 0, &records[3], 3), Ordering::Less);
        assert_eq!(cmp.compare(&records[3], 3, &records[0], 0), Ordering::Greater);
        assert_eq!(cmp.compare(&records[1], 1, &records[1], 1), Ordering::Equal);
    }

    #[test]
    fn text_sorts_case_insensitively() {
        let records = vec![
            json!({"id": 1, "name": "beta"}),
            json!({"id": 2, "name": "Alpha"}),
            json!({"id": 3, "name": "alpha"}),
        ];
        let sort = SortSpec::asc(FieldRef::text("name"));
        assert_eq!(sorted(&records, Some(&sort)), vec![2, 3, 1]);
    }

    #[test]
    fn sort_spec_deserializes() {
        let spec: SortSpec = serde_json::from_value(json!({
            "field": {"name": "monthlyPremium", "type": "currency"},
            "direction": "desc"
        }))
        .unwrap();
        assert_eq!(spec, SortSpec::desc(FieldRef::currency("monthlyPremium")));
    }
}
