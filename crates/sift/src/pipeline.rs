//! The filter, search, sort, paginate pipeline.
//!
//! [`Pipeline::recompute`] runs a [`Query`] over an in-memory collection in a
//! fixed order:
//!
//! 1. filter with every active [`FilterSpec`](crate::FilterSpec)
//! 2. search the filtered records
//! 3. count the matches
//! 4. sort the matches
//! 5. clamp the page index and slice out the page
//! 6. count facets, each with its own dimension's filter removed
//!
//! Every spec is compiled before any record is touched, so a malformed query
//! fails without producing a partial result.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::facet::{Facet, FacetCounts};
use crate::filter::{CompiledFilter, PredicateCompiler, Sentinels};
use crate::ordering::Comparator;
use crate::page::PageSpec;
use crate::query::Query;
use crate::record::{FieldRef, Record, Schema};
use crate::search::SearchMatcher;

/// The derived view of a collection under a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewResult {
    /// Collection indices of the records on the current page, in order.
    pub visible: Vec<usize>,
    /// Records matching all filters and the search, across every page.
    pub match_count: usize,
    /// Number of pages; zero when nothing matches.
    pub page_count: usize,
    /// The page actually shown, after clamping.
    pub page: PageSpec,
    /// Counts for each declared facet dimension.
    pub facets: FacetCounts,
}

impl ViewResult {
    /// Records on the current page.
    pub fn records<'c, T>(&self, collection: &'c [T]) -> Vec<&'c T> {
        self.visible
            .iter()
            .filter_map(|&i| collection.get(i))
            .collect()
    }
}

/// Runs queries against collections of one record schema.
#[derive(Debug, Clone)]
pub struct Pipeline {
    schema: Schema,
    sentinels: Sentinels,
    facets: Vec<FieldRef>,
}

impl Pipeline {
    /// Creates a pipeline with the default sentinels and no facets.
    pub fn new(schema: Schema) -> Self {
        Pipeline {
            schema,
            sentinels: Sentinels::default(),
            facets: Vec::new(),
        }
    }

    /// Replaces the no-op sentinel values.
    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Declares the facet dimensions to count, in display order.
    ///
    /// Every dimension must be a schema field.
    pub fn with_facets<I, S>(mut self, dimensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.facets = dimensions
            .into_iter()
            .map(|d| {
                let d = d.as_ref();
                self.schema
                    .field(d)
                    .cloned()
                    .ok_or_else(|| QueryError::UnknownFacet {
                        dimension: d.to_string(),
                    })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// The schema queries are compiled against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The no-op sentinel values.
    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    /// Declared facet dimensions.
    pub fn facet_dimensions(&self) -> impl Iterator<Item = &str> {
        self.facets.iter().map(|f| f.name())
    }

    /// Checks a query against the schema without running it.
    pub fn validate(&self, query: &Query) -> Result<()> {
        self.compile(query).map(|_| ())
    }

    /// Runs `query` over `collection`.
    pub fn recompute<T: Record>(&self, collection: &[T], query: &Query) -> Result<ViewResult> {
        let compiled = self.compile(query)?;

        let mut matched: Vec<usize> = collection
            .iter()
            .enumerate()
            .filter(|(_, record)| compiled.matches(*record))
            .map(|(i, _)| i)
            .collect();
        let match_count = matched.len();

        compiled.comparator.sort(collection, &mut matched);

        let requested = query.page_spec();
        let page = requested.clamp(match_count);
        if page.index != requested.index {
            debug!(
                target: "sift::pipeline",
                requested = requested.index,
                clamped = page.index,
                match_count,
                "page index clamped"
            );
        }
        let visible = matched[page.window(match_count)].to_vec();
        let page_count = page.page_count(match_count);

        let facets = self.count_facets(collection, query, &compiled.search)?;

        debug!(
            target: "sift::pipeline",
            total = collection.len(),
            filters = compiled.filter.len(),
            match_count,
            page = page.index,
            page_count,
            "recomputed view"
        );

        Ok(ViewResult {
            visible,
            match_count,
            page_count,
            page,
            facets,
        })
    }

    /// Indices of records matching the filters and search of `query`,
    /// in collection order.
    pub fn matching<T: Record>(&self, collection: &[T], query: &Query) -> Result<Vec<usize>> {
        let compiled = self.compile(query)?;
        Ok(collection
            .iter()
            .enumerate()
            .filter(|(_, record)| compiled.matches(*record))
            .map(|(i, _)| i)
            .collect())
    }

    fn compile(&self, query: &Query) -> Result<Compiled> {
        query.page_spec().validate()?;

        let filter =
            PredicateCompiler::new(&self.schema, &self.sentinels).compile(query.filters())?;

        for field in &query.search_spec().fields {
            if self.schema.field(field.name()).is_none() {
                return Err(QueryError::UnknownSearchField {
                    field: field.name().to_string(),
                });
            }
        }
        let search = SearchMatcher::compile(query.search_spec());

        if let Some(sort) = query.sort() {
            if self.schema.field(sort.field.name()).is_none() {
                return Err(QueryError::UnknownSortField {
                    field: sort.field.name().to_string(),
                });
            }
        }
        let comparator = Comparator::compile(query.sort());

        trace!(
            target: "sift::pipeline",
            filters = filter.len(),
            search = !search.is_trivial(),
            sorted = query.sort().is_some(),
            "compiled query"
        );

        Ok(Compiled {
            filter,
            search,
            comparator,
        })
    }

    fn count_facets<T: Record>(
        &self,
        collection: &[T],
        query: &Query,
        search: &SearchMatcher,
    ) -> Result<FacetCounts> {
        let compiler = PredicateCompiler::new(&self.schema, &self.sentinels);
        let mut facets = Vec::with_capacity(self.facets.len());
        for field in &self.facets {
            let others = compiler.compile(query.filters_except(field.name()))?;
            let records = collection
                .iter()
                .filter(|record| others.matches(*record) && search.matches(*record));
            facets.push(Facet::count(field.name(), field, records));
        }
        Ok(FacetCounts::new(facets))
    }
}

struct Compiled {
    filter: CompiledFilter,
    search: SearchMatcher,
    comparator: Comparator,
}

impl Compiled {
    fn matches<T: Record>(&self, record: &T) -> bool {
        self.filter.matches(record) && self.search.matches(record)
    }
}
