//! The state of one listing view.
//!
//! A [`ViewState`] owns a collection and the current [`Query`] and keeps the
//! derived [`ViewResult`] in step with both. Every mutation replaces exactly
//! one part of the query and recomputes the whole result before returning.
//!
//! Mutations other than [`go_to_page`](ViewState::go_to_page) and
//! [`set_page_size`](ViewState::set_page_size) send the view back to page 0.
//! A mutation that fails leaves the query and the result as they were.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift::{Constraint, Dir, FieldRef, Schema, ViewConfig, ViewState};
//!
//! let schema = Schema::new("id", [
//!     FieldRef::text("name"),
//!     FieldRef::enumeration("type"),
//!     FieldRef::currency("monthlyPremium"),
//! ]);
//! let config = ViewConfig::default()
//!     .with_searchable(["name"])
//!     .with_facets(["type"])
//!     .with_page_size(2);
//!
//! let plans = vec![
//!     json!({"id": "p1", "name": "Gold Family", "type": "family", "monthlyPremium": "$480"}),
//!     json!({"id": "p2", "name": "Bronze", "type": "individual", "monthlyPremium": "$150"}),
//!     json!({"id": "p3", "name": "Silver Family", "type": "family", "monthlyPremium": "$320"}),
//! ];
//!
//! let mut view = ViewState::new(plans, schema, &config)?;
//! view.set_filter("type", Constraint::equals("family"))?;
//! view.set_sort("monthlyPremium", Dir::Asc)?;
//!
//! assert_eq!(view.visible_ids(), vec!["p3", "p1"]);
//! assert_eq!(view.match_count(), 2);
//! # Ok::<(), sift::QueryError>(())
//! ```

use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::{QueryError, Result};
use crate::facet::FacetCounts;
use crate::filter::{Constraint, FilterSpec};
use crate::ordering::{Dir, SortSpec};
use crate::page::PageSpec;
use crate::pipeline::{Pipeline, ViewResult};
use crate::query::Query;
use crate::record::{Record, Schema, Schematic};

/// A single listing view: collection, query, and derived result.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    collection: Vec<T>,
    pipeline: Pipeline,
    defaults: Query,
    toggle_direction: Dir,
    query: Query,
    result: ViewResult,
}

impl<T: Record> ViewState<T> {
    /// Creates a view over `collection` configured by `config`.
    ///
    /// Fails if a record lacks an identifier, two records share one, or the
    /// config names a field `schema` does not declare.
    pub fn new(collection: Vec<T>, schema: Schema, config: &ViewConfig) -> Result<Self> {
        let defaults = config.default_query(&schema)?;
        let pipeline = config.pipeline(schema)?;
        let mut view = ViewState::with_pipeline(collection, pipeline, defaults)?;
        view.toggle_direction = config.toggle_direction;
        Ok(view)
    }

    /// Creates a view from a prepared pipeline and initial query.
    pub fn with_pipeline(collection: Vec<T>, pipeline: Pipeline, initial: Query) -> Result<Self> {
        pipeline.schema().validate_ids(&collection)?;
        let result = pipeline.recompute(&collection, &initial)?;
        let mut query = initial.clone();
        query.set_page(result.page);
        debug!(
            target: "sift::view",
            records = collection.len(),
            match_count = result.match_count,
            "view created"
        );
        Ok(ViewState {
            collection,
            pipeline,
            defaults: initial,
            toggle_direction: Dir::Asc,
            query,
            result,
        })
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Sets the constraint on `dimension`, replacing any previous one.
    pub fn set_filter(&mut self, dimension: &str, constraint: Constraint) -> Result<()> {
        let mut query = self.query.clone();
        query.set_filter(FilterSpec::new(dimension, constraint));
        self.apply("set_filter", query)
    }

    /// Removes the constraint on `dimension`.
    pub fn clear_filter(&mut self, dimension: &str) -> Result<()> {
        if self.schema().field(dimension).is_none() {
            return Err(self.reject(
                "clear_filter",
                QueryError::UnknownDimension {
                    dimension: dimension.to_string(),
                },
            ));
        }
        let mut query = self.query.clone();
        query.remove_filter(dimension);
        self.apply("clear_filter", query)
    }

    /// Removes every filter.
    pub fn clear_all_filters(&mut self) -> Result<()> {
        let mut query = self.query.clone();
        query.clear_filters();
        self.apply("clear_all_filters", query)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Sets the search text. Blank text matches everything.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> Result<()> {
        let mut query = self.query.clone();
        query.set_search_text(text.into());
        self.apply("set_search_text", query)
    }

    // ========================================================================
    // Sort
    // ========================================================================

    /// Sorts by `field` in `dir`.
    pub fn set_sort(&mut self, field: &str, dir: Dir) -> Result<()> {
        let Some(field_ref) = self.schema().field(field).cloned() else {
            return Err(self.reject(
                "set_sort",
                QueryError::UnknownSortField {
                    field: field.to_string(),
                },
            ));
        };
        let mut query = self.query.clone();
        query.set_sort(Some(SortSpec::new(field_ref, dir)));
        self.apply("set_sort", query)
    }

    /// Flips the direction if `field` is already the sort field, otherwise
    /// sorts by `field` in the configured default direction.
    pub fn toggle_sort(&mut self, field: &str) -> Result<()> {
        let dir = match self.query.sort() {
            Some(sort) if sort.field.name() == field => sort.dir.flip(),
            _ => self.toggle_direction,
        };
        self.set_sort(field, dir)
    }

    /// Flips the direction of the active sort. Without a sort this does
    /// nothing.
    pub fn toggle_sort_direction(&mut self) -> Result<()> {
        let Some(sort) = self.query.sort() else {
            return Ok(());
        };
        let flipped = SortSpec::new(sort.field.clone(), sort.dir.flip());
        let mut query = self.query.clone();
        query.set_sort(Some(flipped));
        self.apply("toggle_sort_direction", query)
    }

    /// Drops the sort, returning to collection order.
    pub fn clear_sort(&mut self) -> Result<()> {
        let mut query = self.query.clone();
        query.set_sort(None);
        self.apply("clear_sort", query)
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Moves to page `index`, clamped to the last page.
    pub fn go_to_page(&mut self, index: usize) -> Result<()> {
        let mut query = self.query.clone();
        query.set_page(PageSpec {
            index,
            size: self.page_size(),
        });
        self.apply_keeping_page("go_to_page", query)
    }

    /// Changes the page size and returns to page 0.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        let page = match PageSpec::first(size) {
            Ok(page) => page,
            Err(err) => return Err(self.reject("set_page_size", err)),
        };
        let mut query = self.query.clone();
        query.set_page(page);
        self.apply_keeping_page("set_page_size", query)
    }

    // ========================================================================
    // Whole-view changes
    // ========================================================================

    /// Swaps in a freshly fetched collection, keeping the query.
    ///
    /// The page index is clamped to the new result rather than reset.
    pub fn replace_collection(&mut self, collection: Vec<T>) -> Result<()> {
        if let Err(err) = self.schema().validate_ids(&collection) {
            return Err(self.reject("replace_collection", err));
        }
        match self.pipeline.recompute(&collection, &self.query) {
            Ok(result) => {
                self.collection = collection;
                let query = self.query.clone();
                self.commit("replace_collection", query, result);
                Ok(())
            }
            Err(err) => Err(self.reject("replace_collection", err)),
        }
    }

    /// Restores the query the view was created with.
    pub fn reset(&mut self) -> Result<()> {
        let query = self.defaults.clone();
        self.apply_keeping_page("reset", query)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The full collection, in its original order.
    pub fn collection(&self) -> &[T] {
        &self.collection
    }

    /// Gives the collection back.
    pub fn into_collection(self) -> Vec<T> {
        self.collection
    }

    /// The current query. Its page is the clamped page actually shown.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The last successfully computed result.
    pub fn result(&self) -> &ViewResult {
        &self.result
    }

    /// The pipeline queries run through.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The record schema.
    pub fn schema(&self) -> &Schema {
        self.pipeline.schema()
    }

    /// Records on the current page, in display order.
    pub fn visible_records(&self) -> Vec<&T> {
        self.result.records(&self.collection)
    }

    /// Identifiers of the records on the current page, in display order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_records()
            .into_iter()
            .filter_map(|record| self.schema().record_id(record))
            .collect()
    }

    /// Records matching the filters and search, across every page.
    pub fn match_count(&self) -> usize {
        self.result.match_count
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.result.page_count
    }

    /// 0-based index of the page shown.
    pub fn page_index(&self) -> usize {
        self.result.page.index
    }

    /// Records per page.
    pub fn page_size(&self) -> usize {
        self.result.page.size
    }

    /// Facet counts for the declared dimensions.
    pub fn facets(&self) -> &FacetCounts {
        &self.result.facets
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn apply(&mut self, operation: &'static str, mut query: Query) -> Result<()> {
        query.set_page(PageSpec {
            index: 0,
            size: self.page_size(),
        });
        self.apply_keeping_page(operation, query)
    }

    fn apply_keeping_page(&mut self, operation: &'static str, query: Query) -> Result<()> {
        match self.pipeline.recompute(&self.collection, &query) {
            Ok(result) => {
                self.commit(operation, query, result);
                Ok(())
            }
            Err(err) => Err(self.reject(operation, err)),
        }
    }

    fn commit(&mut self, operation: &'static str, mut query: Query, result: ViewResult) {
        query.set_page(result.page);
        debug!(
            target: "sift::view",
            operation,
            match_count = result.match_count,
            page = result.page.index,
            "view updated"
        );
        self.query = query;
        self.result = result;
    }

    fn reject(&self, operation: &'static str, err: QueryError) -> QueryError {
        warn!(target: "sift::view", operation, error = %err, "mutation rejected");
        err
    }
}

impl<T: Schematic> ViewState<T> {
    /// Creates a view over typed records using their declared schema.
    pub fn from_records(collection: Vec<T>, config: &ViewConfig) -> Result<Self> {
        ViewState::new(collection, T::schema(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldRef;
    use serde_json::{json, Value as Json};

    fn schema() -> Schema {
        Schema::new(
            "id",
            [
                FieldRef::text("name"),
                FieldRef::enumeration("group"),
                FieldRef::numeric("rank"),
            ],
        )
    }

    fn records(n: usize) -> Vec<Json> {
        (1..=n)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("item {i}"),
                    "group": if i <= 5 { "a" } else { "b" },
                    "rank": (n + 1 - i),
                })
            })
            .collect()
    }

    fn view(n: usize) -> ViewState<Json> {
        let config = ViewConfig::default()
            .with_searchable(["name"])
            .with_facets(["group"]);
        ViewState::new(records(n), schema(), &config).unwrap()
    }

    #[test]
    fn starts_on_first_page_of_defaults() {
        let view = view(25);
        assert_eq!(view.match_count(), 25);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.visible_records().len(), 10);
        assert_eq!(view.visible_ids().first().map(String::as_str), Some("1"));
    }

    #[test]
    fn filter_change_returns_to_first_page() {
        let mut view = view(25);
        view.go_to_page(2).unwrap();
        assert_eq!(view.visible_ids(), vec!["21", "22", "23", "24", "25"]);

        view.set_filter("group", Constraint::equals("a")).unwrap();
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.match_count(), 5);
        assert_eq!(view.visible_ids(), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn search_and_sort_reset_the_page() {
        let mut view = view(25);
        view.go_to_page(1).unwrap();
        view.set_search_text("item 1").unwrap();
        assert_eq!(view.page_index(), 0);
        // "item 1", "item 10" .. "item 19"
        assert_eq!(view.match_count(), 11);

        view.go_to_page(1).unwrap();
        assert_eq!(view.page_index(), 1);
        view.set_sort("rank", Dir::Asc).unwrap();
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn go_to_page_clamps() {
        let mut view = view(25);
        view.go_to_page(99).unwrap();
        assert_eq!(view.page_index(), 2);
        assert_eq!(view.query().page_spec().index, 2);
    }

    #[test]
    fn set_page_size_returns_to_first_page() {
        let mut view = view(25);
        view.go_to_page(2).unwrap();
        view.set_page_size(4).unwrap();
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.page_count(), 7);
        assert_eq!(view.visible_records().len(), 4);
    }

    #[test]
    fn toggle_sort_flips_active_field() {
        let mut view = view(3);
        view.toggle_sort("rank").unwrap();
        assert_eq!(view.visible_ids(), vec!["3", "2", "1"]);
        view.toggle_sort("rank").unwrap();
        assert_eq!(view.visible_ids(), vec!["1", "2", "3"]);
        view.toggle_sort_direction().unwrap();
        assert_eq!(view.query().sort().map(|s| s.dir), Some(Dir::Asc));

        view.toggle_sort("name").unwrap();
        assert_eq!(view.query().sort().map(|s| s.dir), Some(Dir::Asc));

        view.clear_sort().unwrap();
        assert!(view.query().sort().is_none());
        assert_eq!(view.visible_ids(), vec!["1", "2", "3"]);
        // No active sort: nothing to flip.
        view.toggle_sort_direction().unwrap();
        assert!(view.query().sort().is_none());
    }

    #[test]
    fn failed_mutation_keeps_previous_state() {
        let mut view = view(25);
        view.set_filter("group", Constraint::equals("b")).unwrap();
        view.go_to_page(1).unwrap();
        let query = view.query().clone();
        let result = view.result().clone();

        let err = view
            .set_filter("name", Constraint::between("a", "z"))
            .unwrap_err();
        assert_eq!(err.dimension(), Some("name"));
        assert!(view.set_filter("colour", Constraint::equals("red")).is_err());
        assert!(view.set_sort("missing", Dir::Asc).is_err());
        assert!(view.clear_filter("missing").is_err());
        assert_eq!(view.set_page_size(0), Err(QueryError::InvalidPageSize));

        assert_eq!(view.query(), &query);
        assert_eq!(view.result(), &result);
    }

    #[test]
    fn clear_filters() {
        let mut view = view(25);
        view.set_filter("group", Constraint::equals("a")).unwrap();
        view.set_filter("rank", Constraint::at_least(23)).unwrap();
        assert_eq!(view.match_count(), 3);

        view.clear_filter("rank").unwrap();
        assert_eq!(view.match_count(), 5);

        view.clear_all_filters().unwrap();
        assert_eq!(view.match_count(), 25);
    }

    #[test]
    fn facets_track_other_filters() {
        let mut view = view(25);
        view.set_filter("group", Constraint::equals("a")).unwrap();
        let facet = view.facets().get("group").unwrap();
        assert_eq!(facet.total, 25);
        assert_eq!(facet.count_for("b"), 20);

        view.set_filter("rank", Constraint::at_most(10)).unwrap();
        let facet = view.facets().get("group").unwrap();
        assert_eq!(facet.total, 10);
        assert_eq!(facet.count_for("a"), 0);
    }

    #[test]
    fn replace_collection_keeps_query_and_clamps() {
        let mut view = view(25);
        view.go_to_page(2).unwrap();
        view.replace_collection(records(5)).unwrap();
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.visible_ids(), vec!["1", "2", "3", "4", "5"]);

        let dup = vec![json!({"id": 1}), json!({"id": 1})];
        assert_eq!(
            view.replace_collection(dup),
            Err(QueryError::DuplicateRecordId { id: "1".into() })
        );
        assert_eq!(view.collection().len(), 5);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = view(25);
        view.set_filter("group", Constraint::equals("a")).unwrap();
        view.set_search_text("item").unwrap();
        view.reset().unwrap();
        assert_eq!(view.match_count(), 25);
        assert!(view.query().filters().is_empty());
        assert!(view.query().search_spec().is_blank());
    }

    #[test]
    fn creation_validates_identity() {
        let config = ViewConfig::default();
        let missing = vec![json!({"id": 1}), json!({"name": "no id"})];
        assert_eq!(
            ViewState::new(missing, schema(), &config).unwrap_err(),
            QueryError::MissingRecordId { index: 1 }
        );
    }
}
