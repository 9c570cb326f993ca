//! Query description and builder.
//!
//! A [`Query`] is everything the user has chosen on a listing view: active
//! filters, search text, the sort, and the page. It is plain data;
//! [`Pipeline::recompute`](crate::Pipeline::recompute) turns it into a
//! [`ViewResult`](crate::ViewResult).

use serde::{Deserialize, Serialize};

use crate::filter::{Constraint, FilterSpec, Operand};
use crate::ordering::{Dir, SortSpec};
use crate::page::PageSpec;
use crate::record::FieldRef;
use crate::search::SearchSpec;

/// A listing query.
///
/// Filters are keyed by dimension: setting a filter on a dimension that
/// already has one replaces it in place.
///
/// # Example
///
/// ```
/// use sift::{FieldRef, Query};
///
/// let query = Query::new()
///     .equals("type", "family")
///     .at_most("monthlyPremium", 400)
///     .search("gold", [FieldRef::text("name"), FieldRef::text("description")])
///     .order_asc(FieldRef::currency("monthlyPremium"))
///     .page_size(3)
///     .build();
///
/// assert_eq!(query.filters().len(), 2);
/// assert_eq!(query.page_spec().size, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    filters: Vec<FilterSpec>,
    search: SearchSpec,
    sort: Option<SortSpec>,
    page: PageSpec,
}

impl Query {
    /// Creates a new empty query: no filters, blank search, input order,
    /// first page at the default page size.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a filter spec, replacing any spec on the same dimension.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.set_filter(spec);
        self
    }

    /// Adds an `equals` filter.
    pub fn equals(self, dimension: &str, value: impl Into<Operand>) -> Self {
        self.filter(FilterSpec::new(dimension, Constraint::equals(value)))
    }

    /// Adds an `in-range` filter. Either bound may be open.
    pub fn in_range(self, dimension: &str, min: Option<Operand>, max: Option<Operand>) -> Self {
        self.filter(FilterSpec::new(dimension, Constraint::InRange { min, max }))
    }

    /// Adds a closed `in-range` filter.
    pub fn between(
        self,
        dimension: &str,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        self.filter(FilterSpec::new(dimension, Constraint::between(min, max)))
    }

    /// Adds an `in-range` filter with only a lower bound.
    pub fn at_least(self, dimension: &str, min: impl Into<Operand>) -> Self {
        self.filter(FilterSpec::new(dimension, Constraint::at_least(min)))
    }

    /// Adds an `in-range` filter with only an upper bound.
    pub fn at_most(self, dimension: &str, max: impl Into<Operand>) -> Self {
        self.filter(FilterSpec::new(dimension, Constraint::at_most(max)))
    }

    /// Adds a `contains-any` filter.
    pub fn contains_any<I>(self, dimension: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        self.filter(FilterSpec::new(dimension, Constraint::any_of(values)))
    }

    /// Removes the filter on `dimension`, if any.
    pub fn without(mut self, dimension: &str) -> Self {
        self.remove_filter(dimension);
        self
    }

    // ========================================================================
    // Search, sort, page
    // ========================================================================

    /// Sets the search text and the fields it searches.
    pub fn search(
        mut self,
        text: impl Into<String>,
        fields: impl IntoIterator<Item = FieldRef>,
    ) -> Self {
        self.search = SearchSpec::new(text, fields);
        self
    }

    /// Sets the sort.
    pub fn order_by(mut self, field: FieldRef, dir: Dir) -> Self {
        self.sort = Some(SortSpec::new(field, dir));
        self
    }

    /// Sets an ascending sort.
    pub fn order_asc(self, field: FieldRef) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Sets a descending sort.
    pub fn order_desc(self, field: FieldRef) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Drops the sort, keeping input order.
    pub fn unordered(mut self) -> Self {
        self.sort = None;
        self
    }

    /// Sets the 0-based page index.
    pub fn page(mut self, index: usize) -> Self {
        self.page.index = index;
        self
    }

    /// Sets the page size. A zero size is rejected when the query runs.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page.size = size;
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // In-place edits
    // ========================================================================

    pub(crate) fn set_filter(&mut self, spec: FilterSpec) {
        match self
            .filters
            .iter_mut()
            .find(|f| f.dimension == spec.dimension)
        {
            Some(existing) => *existing = spec,
            None => self.filters.push(spec),
        }
    }

    pub(crate) fn remove_filter(&mut self, dimension: &str) {
        self.filters.retain(|f| f.dimension != dimension);
    }

    pub(crate) fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub(crate) fn set_search_text(&mut self, text: String) {
        self.search.text = text;
    }

    pub(crate) fn set_search(&mut self, search: SearchSpec) {
        self.search = search;
    }

    pub(crate) fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    pub(crate) fn set_page(&mut self, page: PageSpec) {
        self.page = page;
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Active filter specs, in the order they were first set.
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// The filter on `dimension`, if any.
    pub fn filter_for(&self, dimension: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.dimension == dimension)
    }

    /// Filter specs on every dimension except `dimension`.
    pub fn filters_except<'a>(
        &'a self,
        dimension: &'a str,
    ) -> impl Iterator<Item = &'a FilterSpec> + 'a {
        self.filters.iter().filter(move |f| f.dimension != dimension)
    }

    /// The search spec.
    pub fn search_spec(&self) -> &SearchSpec {
        &self.search
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The requested page.
    pub fn page_spec(&self) -> PageSpec {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_defaults() {
        let query = Query::new();
        assert!(query.filters().is_empty());
        assert!(query.search_spec().is_blank());
        assert!(query.sort().is_none());
        assert_eq!(query.page_spec(), PageSpec::default());
    }

    #[test]
    fn same_dimension_replaces_in_place() {
        let query = Query::new()
            .equals("type", "family")
            .at_most("monthlyPremium", 400)
            .equals("type", "individual")
            .build();

        assert_eq!(query.filters().len(), 2);
        assert_eq!(query.filters()[0].dimension, "type");
        assert_eq!(
            query.filter_for("type").map(|f| &f.constraint),
            Some(&Constraint::equals("individual"))
        );
    }

    #[test]
    fn without_removes_one_dimension() {
        let query = Query::new()
            .equals("type", "family")
            .contains_any("metal", ["gold", "silver"])
            .without("type");
        assert_eq!(query.filters().len(), 1);
        assert!(query.filter_for("type").is_none());
    }

    #[test]
    fn filters_except_skips_the_facet_dimension() {
        let query = Query::new()
            .equals("type", "family")
            .between("monthlyPremium", 100, 300);
        let dims: Vec<&str> = query
            .filters_except("type")
            .map(|f| f.dimension.as_str())
            .collect();
        assert_eq!(dims, vec!["monthlyPremium"]);
    }

    #[test]
    fn ordering_and_paging() {
        let query = Query::new()
            .order_desc(FieldRef::currency("monthlyPremium"))
            .page(2)
            .page_size(25);
        assert_eq!(query.sort().map(|s| s.dir), Some(Dir::Desc));
        assert_eq!(query.page_spec(), PageSpec { index: 2, size: 25 });
        assert!(query.unordered().sort().is_none());
    }
}
