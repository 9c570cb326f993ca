//! Per-view configuration.
//!
//! A [`ViewConfig`] names which fields a listing view searches, which
//! dimensions it shows facets for, how its catch-all filter option is
//! spelled, and its initial sort and page size. It is loaded from YAML or
//! JSON:
//!
//! ```yaml
//! searchable: [name, description]
//! facets: [type, metal]
//! sentinels: [all, "All Types"]
//! page_size: 12
//! default_sort:
//!   field: monthlyPremium
//!   direction: asc
//! ```
//!
//! Schema-less collections also declare their field table here:
//!
//! ```yaml
//! id_field: orderId
//! fields:
//!   - { name: customer, type: text }
//!   - { name: total, type: currency }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, QueryError, Result};
use crate::filter::{FilterSpec, Sentinels};
use crate::ordering::{Dir, SortSpec};
use crate::page::{PageSpec, DEFAULT_PAGE_SIZE};
use crate::pipeline::Pipeline;
use crate::query::Query;
use crate::record::{FieldRef, Schema};
use crate::search::SearchSpec;

/// The sort a view starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSort {
    pub field: String,
    #[serde(default)]
    pub direction: Dir,
}

/// Configuration of one listing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Identity field for schema-less records.
    pub id_field: String,
    /// Field table for schema-less records. Ignored for typed records.
    pub fields: Vec<FieldRef>,
    /// Fields free-text search looks at.
    pub searchable: Vec<String>,
    /// Dimensions to count facets for, in display order.
    pub facets: Vec<String>,
    /// Filter values that mean "no constraint".
    pub sentinels: Sentinels,
    /// Records per page.
    pub page_size: usize,
    /// Initial sort. `None` keeps collection order.
    pub default_sort: Option<DefaultSort>,
    /// Filters active when the view opens.
    pub filters: Vec<FilterSpec>,
    /// Direction used when sorting by a field that is not already active.
    pub toggle_direction: Dir,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            id_field: "id".to_string(),
            fields: Vec::new(),
            searchable: Vec::new(),
            facets: Vec::new(),
            sentinels: Sentinels::default(),
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: None,
            filters: Vec::new(),
            toggle_direction: Dir::Asc,
        }
    }
}

impl ViewConfig {
    /// Parses a YAML view config.
    pub fn from_yaml(source: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parses a JSON view config.
    pub fn from_json(source: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Sets the searchable fields.
    pub fn with_searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the facet dimensions.
    pub fn with_facets<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the no-op sentinel spellings.
    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the initial sort.
    pub fn with_default_sort(mut self, field: impl Into<String>, direction: Dir) -> Self {
        self.default_sort = Some(DefaultSort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Adds a filter active when the view opens.
    pub fn with_filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    /// Builds a schema from the configured field table.
    pub fn schema(&self) -> std::result::Result<Schema, ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::NoFields);
        }
        Ok(Schema::new(self.id_field.clone(), self.fields.iter().cloned()))
    }

    /// Builds the pipeline for `schema`: sentinels and facet dimensions.
    pub fn pipeline(&self, schema: Schema) -> Result<Pipeline> {
        Pipeline::new(schema)
            .with_sentinels(self.sentinels.clone())
            .with_facets(&self.facets)
    }

    /// The query a view starts with, resolving field names against `schema`.
    pub fn default_query(&self, schema: &Schema) -> Result<Query> {
        let searchable = self
            .searchable
            .iter()
            .map(|name| {
                schema
                    .field(name)
                    .cloned()
                    .ok_or_else(|| QueryError::UnknownSearchField {
                        field: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let sort = self
            .default_sort
            .as_ref()
            .map(|sort| {
                schema
                    .field(&sort.field)
                    .cloned()
                    .map(|field| SortSpec::new(field, sort.direction))
                    .ok_or_else(|| QueryError::UnknownSortField {
                        field: sort.field.clone(),
                    })
            })
            .transpose()?;

        let mut query = Query::new();
        for spec in &self.filters {
            query.set_filter(spec.clone());
        }
        query.set_search(SearchSpec::new("", searchable));
        query.set_sort(sort);
        query.set_page(PageSpec::first(self.page_size)?);
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Constraint;
    use crate::record::FieldType;

    const YAML: &str = r#"
id_field: orderId
fields:
  - { name: customer, type: text }
  - { name: status, type: enum }
  - { name: total, type: currency }
searchable: [customer]
facets: [status]
sentinels: [all, "All Statuses"]
page_size: 5
default_sort:
  field: total
  direction: desc
filters:
  - { dimension: status, operator: equals, value: "All Statuses" }
"#;

    #[test]
    fn loads_yaml() {
        let config = ViewConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.id_field, "orderId");
        assert_eq!(config.fields.len(), 3);
        assert_eq!(config.fields[2].ty, FieldType::Currency);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.sentinels.values(), ["all", "All Statuses"]);
        assert_eq!(
            config.default_sort,
            Some(DefaultSort {
                field: "total".into(),
                direction: Dir::Desc
            })
        );
        assert_eq!(
            config.filters,
            vec![FilterSpec::new("status", Constraint::equals("All Statuses"))]
        );
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = ViewConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.sentinels, Sentinels::default());
        assert!(matches!(config.schema(), Err(ConfigError::NoFields)));
    }

    #[test]
    fn default_query_resolves_names() {
        let config = ViewConfig::from_yaml(YAML).unwrap();
        let schema = config.schema().unwrap();
        let query = config.default_query(&schema).unwrap();

        assert_eq!(query.search_spec().fields, vec![FieldRef::text("customer")]);
        assert_eq!(
            query.sort(),
            Some(&SortSpec::desc(FieldRef::currency("total")))
        );
        assert_eq!(query.page_spec(), PageSpec { index: 0, size: 5 });
        assert_eq!(query.filters().len(), 1);
    }

    #[test]
    fn unknown_names_are_errors() {
        let schema = ViewConfig::from_yaml(YAML).unwrap().schema().unwrap();

        let config = ViewConfig::default().with_searchable(["notes"]);
        assert!(matches!(
            config.default_query(&schema),
            Err(QueryError::UnknownSearchField { .. })
        ));

        let config = ViewConfig::default().with_default_sort("rating", Dir::Asc);
        assert!(matches!(
            config.default_query(&schema),
            Err(QueryError::UnknownSortField { .. })
        ));

        let config = ViewConfig::default().with_facets(["region"]);
        assert!(matches!(
            config.pipeline(schema.clone()),
            Err(QueryError::UnknownFacet { .. })
        ));

        let config = ViewConfig::default().with_page_size(0);
        assert_eq!(
            config.default_query(&schema),
            Err(QueryError::InvalidPageSize)
        );
    }

    #[test]
    fn malformed_config_reports_parse_error() {
        let err = ViewConfig::from_yaml("page_size: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(err.to_string().starts_with("YAML view config is invalid"));
    }
}
