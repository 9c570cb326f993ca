//! Error types for the sift crate.

use thiserror::Error;

use crate::filter::FilterOp;
use crate::record::FieldType;

/// Errors raised while compiling or running a query.
///
/// These are programmer errors in the calling view (a filter on a field the
/// schema does not declare, a range over a text field). They abort the
/// recompute that raised them; the previous result stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Filter dimension not declared by the schema.
    #[error("unknown filter dimension '{dimension}'")]
    UnknownDimension { dimension: String },

    /// Operator name that does not exist.
    #[error("unknown operator '{operator}' on dimension '{dimension}'")]
    UnknownOperator { dimension: String, operator: String },

    /// Operator that cannot apply to the dimension's field type.
    #[error("operator '{operator}' is not valid for {field_type} dimension '{dimension}'")]
    UnsupportedOperator {
        dimension: String,
        operator: FilterOp,
        field_type: FieldType,
    },

    /// Operand that does not normalize under the dimension's field type.
    #[error("invalid value for '{operator}' on dimension '{dimension}': {message}")]
    InvalidOperand {
        dimension: String,
        operator: FilterOp,
        message: String,
    },

    /// Sort field not declared by the schema.
    #[error("unknown sort field '{field}'")]
    UnknownSortField { field: String },

    /// Search field not declared by the schema.
    #[error("unknown search field '{field}'")]
    UnknownSearchField { field: String },

    /// Facet dimension not declared by the schema.
    #[error("unknown facet dimension '{dimension}'")]
    UnknownFacet { dimension: String },

    /// Page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Record whose identifier field is missing.
    #[error("record at index {index} has no identifier")]
    MissingRecordId { index: usize },

    /// Two records sharing an identifier, compared as text.
    #[error("duplicate record identifier '{id}'")]
    DuplicateRecordId { id: String },
}

impl QueryError {
    /// The filter dimension the error is about, if any.
    pub fn dimension(&self) -> Option<&str> {
        match self {
            QueryError::UnknownDimension { dimension }
            | QueryError::UnknownOperator { dimension, .. }
            | QueryError::UnsupportedOperator { dimension, .. }
            | QueryError::InvalidOperand { dimension, .. }
            | QueryError::UnknownFacet { dimension } => Some(dimension),
            _ => None,
        }
    }

    /// The operator the error is about, if any.
    pub fn operator(&self) -> Option<&str> {
        match self {
            QueryError::UnknownOperator { operator, .. } => Some(operator),
            QueryError::UnsupportedOperator { operator, .. }
            | QueryError::InvalidOperand { operator, .. } => Some(operator.as_str()),
            _ => None,
        }
    }
}

/// Errors raised while loading a [`ViewConfig`](crate::ViewConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML view config is invalid: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON view config is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("view config has no field table for a schema-less collection")]
    NoFields,

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_name_the_offending_spec() {
        let err = QueryError::UnsupportedOperator {
            dimension: "name".into(),
            operator: FilterOp::InRange,
            field_type: FieldType::Text,
        };
        assert_eq!(err.dimension(), Some("name"));
        assert_eq!(err.operator(), Some("in-range"));
        assert_eq!(
            err.to_string(),
            "operator 'in-range' is not valid for text dimension 'name'"
        );

        let err = QueryError::UnknownOperator {
            dimension: "type".into(),
            operator: "between".into(),
        };
        assert_eq!(err.operator(), Some("between"));

        assert_eq!(QueryError::InvalidPageSize.dimension(), None);
    }
}
