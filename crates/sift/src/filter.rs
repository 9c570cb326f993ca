//! Filter specifications and the predicate compiler.
//!
//! A [`FilterSpec`] constrains one dimension of the schema. A set of specs is
//! compiled by [`PredicateCompiler`] into a [`CompiledFilter`], which ANDs the
//! constraints together:
//!
//! ```text
//! match = every non-no-op constraint matches
//! ```
//!
//! A constraint whose value is a configured sentinel (`"all"`,
//! `"All Categories"`, ...) is a no-op and is left out of the fold, so it can
//! never filter a record out.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::accessor::{normalize, resolve, Normalized};
use crate::error::{QueryError, Result};
use crate::record::{FieldRef, Record, Schema};
use crate::value::{Number, Timestamp, Value};

/// Filter operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOp {
    /// Normalized-value equality.
    Equals,
    /// Inclusive bounds on a numeric, currency or date field. Either bound may be open.
    InRange,
    /// The value (or one element of a collection field) is one of the candidates.
    ContainsAny,
    /// No constraint on this dimension.
    All,
}

impl FilterOp {
    /// Parses an operator name for `dimension`.
    ///
    /// Accepts the kebab-case names plus `eq`, `range`, `in` and `any`.
    pub fn parse(dimension: &str, name: &str) -> Result<FilterOp> {
        match name.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" => Ok(FilterOp::Equals),
            "in-range" | "range" => Ok(FilterOp::InRange),
            "contains-any" | "in" | "any" => Ok(FilterOp::ContainsAny),
            "all" => Ok(FilterOp::All),
            _ => Err(QueryError::UnknownOperator {
                dimension: dimension.to_string(),
                operator: name.to_string(),
            }),
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Equals => "equals",
            FilterOp::InRange => "in-range",
            FilterOp::ContainsAny => "contains-any",
            FilterOp::All => "all",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned comparison value stored in a constraint.
///
/// Operands are normalized with the target field's type when the filter is
/// compiled, so `"$150"` is a valid bound on a currency field and
/// `"2024-01-01"` on a date field.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// String value.
    Text(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
}

impl Operand {
    /// Borrows this operand as a raw value.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::Text(s) => Value::String(s),
            Operand::Number(n) => Value::Number(*n),
            Operand::Timestamp(t) => Value::Timestamp(*t),
            Operand::Bool(b) => Value::Bool(*b),
        }
    }

    /// Reads a JSON scalar. Arrays, objects and `null` are not operands.
    pub fn from_json(value: &serde_json::Value) -> Option<Operand> {
        match value {
            serde_json::Value::String(s) => Some(Operand::Text(s.clone())),
            serde_json::Value::Bool(b) => Some(Operand::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Number::I64)
                .or_else(|| n.as_u64().map(Number::U64))
                .or_else(|| n.as_f64().map(Number::F64))
                .map(Operand::Number),
            _ => None,
        }
    }

    /// Writes this operand as a JSON scalar.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Operand::Text(s) => serde_json::Value::from(s.as_str()),
            Operand::Number(Number::I64(n)) => serde_json::Value::from(*n),
            Operand::Number(Number::U64(n)) => serde_json::Value::from(*n),
            Operand::Number(Number::F64(n)) => serde_json::Value::from(*n),
            Operand::Timestamp(t) => serde_json::Value::from(t.as_millis()),
            Operand::Bool(b) => serde_json::Value::from(*b),
        }
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl From<Timestamp> for Operand {
    fn from(t: Timestamp) -> Self {
        Operand::Timestamp(t)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

macro_rules! operand_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(n: $t) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )*
    };
}

operand_from_number!(i32, i64, u32, u64, usize, f32, f64);

/// The constraint placed on one filter dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Normalized-value equality.
    Equals(Operand),
    /// Inclusive range. A missing bound is open.
    InRange {
        min: Option<Operand>,
        max: Option<Operand>,
    },
    /// Matches if the value is one of the candidates.
    ContainsAny(Vec<Operand>),
    /// No constraint.
    All,
}

impl Constraint {
    /// An `equals` constraint.
    pub fn equals(value: impl Into<Operand>) -> Self {
        Constraint::Equals(value.into())
    }

    /// A closed `in-range` constraint.
    pub fn between(min: impl Into<Operand>, max: impl Into<Operand>) -> Self {
        Constraint::InRange {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// An `in-range` constraint with only a lower bound.
    pub fn at_least(min: impl Into<Operand>) -> Self {
        Constraint::InRange {
            min: Some(min.into()),
            max: None,
        }
    }

    /// An `in-range` constraint with only an upper bound.
    pub fn at_most(max: impl Into<Operand>) -> Self {
        Constraint::InRange {
            min: None,
            max: Some(max.into()),
        }
    }

    /// A `contains-any` constraint.
    pub fn any_of<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Constraint::ContainsAny(values.into_iter().map(Into::into).collect())
    }

    /// The operator this constraint applies.
    pub fn op(&self) -> FilterOp {
        match self {
            Constraint::Equals(_) => FilterOp::Equals,
            Constraint::InRange { .. } => FilterOp::InRange,
            Constraint::ContainsAny(_) => FilterOp::ContainsAny,
            Constraint::All => FilterOp::All,
        }
    }
}

/// A constraint on one named dimension.
///
/// Serializes as `{dimension, operator, value}`, where `value` is a scalar
/// for `equals`, a `{min, max}` object for `in-range`, a list for
/// `contains-any`, and absent for `all`. A scalar `in-range` value reads as
/// the one-point range `{min: v, max: v}`, so `"value": "all"` is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterSpec", into = "RawFilterSpec")]
pub struct FilterSpec {
    /// The schema field this spec constrains.
    pub dimension: String,
    /// The constraint itself.
    pub constraint: Constraint,
}

impl FilterSpec {
    /// Creates a new filter spec.
    pub fn new(dimension: impl Into<String>, constraint: Constraint) -> Self {
        FilterSpec {
            dimension: dimension.into(),
            constraint,
        }
    }

    /// The operator this spec applies.
    pub fn op(&self) -> FilterOp {
        self.constraint.op()
    }

    fn invalid(&self, message: impl Into<String>) -> QueryError {
        QueryError::InvalidOperand {
            dimension: self.dimension.clone(),
            operator: self.op(),
            message: message.into(),
        }
    }
}

/// Wire shape of a [`FilterSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFilterSpec {
    pub dimension: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
}

impl TryFrom<RawFilterSpec> for FilterSpec {
    type Error = QueryError;

    fn try_from(raw: RawFilterSpec) -> Result<Self> {
        let op = FilterOp::parse(&raw.dimension, &raw.operator)?;
        let invalid = |message: &str| QueryError::InvalidOperand {
            dimension: raw.dimension.clone(),
            operator: op,
            message: message.to_string(),
        };
        let scalar = |value: &serde_json::Value| {
            Operand::from_json(value).ok_or_else(|| invalid("expected a string, number or bool"))
        };
        let bound = |value: Option<&serde_json::Value>| match value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => scalar(v).map(Some),
        };

        let constraint = match op {
            FilterOp::Equals => Constraint::Equals(scalar(&raw.value)?),
            FilterOp::InRange => match &raw.value {
                serde_json::Value::Object(map) => Constraint::InRange {
                    min: bound(map.get("min"))?,
                    max: bound(map.get("max"))?,
                },
                serde_json::Value::Null => Constraint::InRange {
                    min: None,
                    max: None,
                },
                serde_json::Value::Array(_) => {
                    return Err(invalid("expected a {min, max} object or a scalar"))
                }
                point => {
                    let point = scalar(point)?;
                    Constraint::InRange {
                        min: Some(point.clone()),
                        max: Some(point),
                    }
                }
            },
            FilterOp::ContainsAny => match &raw.value {
                serde_json::Value::Array(items) => Constraint::ContainsAny(
                    items.iter().map(scalar).collect::<Result<Vec<_>>>()?,
                ),
                serde_json::Value::Null => Constraint::ContainsAny(Vec::new()),
                single => Constraint::ContainsAny(vec![scalar(single)?]),
            },
            FilterOp::All => Constraint::All,
        };

        Ok(FilterSpec {
            dimension: raw.dimension,
            constraint,
        })
    }
}

impl From<FilterSpec> for RawFilterSpec {
    fn from(spec: FilterSpec) -> Self {
        let operator = spec.op().as_str().to_string();
        let value = match spec.constraint {
            Constraint::Equals(v) => v.to_json(),
            Constraint::InRange { min, max } => {
                let mut map = serde_json::Map::new();
                if let Some(min) = min {
                    map.insert("min".into(), min.to_json());
                }
                if let Some(max) = max {
                    map.insert("max".into(), max.to_json());
                }
                serde_json::Value::Object(map)
            }
            Constraint::ContainsAny(values) => {
                serde_json::Value::Array(values.iter().map(Operand::to_json).collect())
            }
            Constraint::All => serde_json::Value::Null,
        };
        RawFilterSpec {
            dimension: spec.dimension,
            operator,
            value,
        }
    }
}

/// Values that mean "no constraint on this dimension".
///
/// Listing views spell their catch-all option differently (`"all"`,
/// `"All Categories"`, `"Any"`), so the set is configured per view. Matching
/// ignores case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sentinels(Vec<String>);

impl Default for Sentinels {
    fn default() -> Self {
        Sentinels(vec!["all".to_string()])
    }
}

impl Sentinels {
    /// Creates a sentinel set from the given spellings.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Sentinels(values.into_iter().map(Into::into).collect())
    }

    /// A set with no sentinels at all.
    pub fn none() -> Self {
        Sentinels(Vec::new())
    }

    /// The configured spellings.
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if `operand` is one of the sentinels.
    pub fn is_sentinel(&self, operand: &Operand) -> bool {
        match operand {
            Operand::Text(s) => {
                let s = s.trim();
                self.0.iter().any(|v| v.trim().eq_ignore_ascii_case(s))
            }
            _ => false,
        }
    }

    /// Returns `true` if a range bound is absent or a sentinel.
    pub fn is_open_bound(&self, bound: Option<&Operand>) -> bool {
        bound.map_or(true, |b| self.is_sentinel(b))
    }

    /// Returns `true` if `constraint` places no constraint at all.
    pub fn is_noop(&self, constraint: &Constraint) -> bool {
        match constraint {
            Constraint::All => true,
            Constraint::Equals(v) => self.is_sentinel(v),
            Constraint::ContainsAny(values) => {
                values.is_empty() || values.iter().any(|v| self.is_sentinel(v))
            }
            Constraint::InRange { min, max } => {
                self.is_open_bound(min.as_ref()) && self.is_open_bound(max.as_ref())
            }
        }
    }
}

/// Compiles filter specs against a schema.
#[derive(Debug, Clone, Copy)]
pub struct PredicateCompiler<'s> {
    schema: &'s Schema,
    sentinels: &'s Sentinels,
}

impl<'s> PredicateCompiler<'s> {
    /// Creates a compiler for `schema` that treats `sentinels` as no-ops.
    pub fn new(schema: &'s Schema, sentinels: &'s Sentinels) -> Self {
        PredicateCompiler { schema, sentinels }
    }

    /// Compiles `specs` into a single AND-ed predicate.
    ///
    /// An empty set, or one made only of no-op specs, compiles to the
    /// constant-true predicate. The first malformed spec aborts compilation.
    pub fn compile<'a, I>(&self, specs: I) -> Result<CompiledFilter>
    where
        I: IntoIterator<Item = &'a FilterSpec>,
    {
        let mut clauses = Vec::new();
        for spec in specs {
            let field = self
                .schema
                .field(&spec.dimension)
                .ok_or_else(|| QueryError::UnknownDimension {
                    dimension: spec.dimension.clone(),
                })?;

            if self.sentinels.is_noop(&spec.constraint) {
                trace!(
                    target: "sift::filter",
                    dimension = %spec.dimension,
                    "skipping no-op filter"
                );
                continue;
            }

            let test = compile_test(spec, field, self.sentinels)?;
            trace!(
                target: "sift::filter",
                dimension = %spec.dimension,
                op = %spec.op(),
                "compiled filter clause"
            );
            clauses.push(CompiledClause {
                field: field.clone(),
                test,
            });
        }
        Ok(CompiledFilter { clauses })
    }
}

fn compile_test(spec: &FilterSpec, field: &FieldRef, sentinels: &Sentinels) -> Result<Test> {
    let operand = |value: &Operand| {
        let normalized = normalize(&value.as_value(), field.ty);
        if normalized.is_missing() {
            Err(spec.invalid(format!("{:?} is not a valid {} value", value, field.ty)))
        } else {
            Ok(normalized)
        }
    };

    match &spec.constraint {
        Constraint::Equals(value) => Ok(Test::Equals(operand(value)?)),
        Constraint::InRange { min, max } => {
            if !field.ty.is_ordinal() {
                return Err(QueryError::UnsupportedOperator {
                    dimension: spec.dimension.clone(),
                    operator: FilterOp::InRange,
                    field_type: field.ty,
                });
            }
            let bound = |b: &Option<Operand>| match b {
                Some(b) if !sentinels.is_sentinel(b) => operand(b).map(Some),
                _ => Ok(None),
            };
            let min = bound(min)?;
            let max = bound(max)?;
            if let (Some(lo), Some(hi)) = (&min, &max) {
                if lo > hi {
                    return Err(spec.invalid("lower bound is greater than upper bound"));
                }
            }
            Ok(Test::Range { min, max })
        }
        Constraint::ContainsAny(values) => Ok(Test::AnyOf(
            values.iter().map(operand).collect::<Result<Vec<_>>>()?,
        )),
        // Filtered out as a no-op before we get here.
        Constraint::All => Ok(Test::Always),
    }
}

#[derive(Debug, Clone)]
enum Test {
    Equals(Normalized),
    Range {
        min: Option<Normalized>,
        max: Option<Normalized>,
    },
    AnyOf(Vec<Normalized>),
    Always,
}

impl Test {
    fn matches(&self, value: &Normalized) -> bool {
        match self {
            Test::Equals(expected) => value.elements().any(|e| e == expected),
            // Missing has no elements, so it never satisfies a bound.
            Test::Range { min, max } => value.elements().any(|e| {
                min.as_ref().map_or(true, |lo| e >= lo) && max.as_ref().map_or(true, |hi| e <= hi)
            }),
            Test::AnyOf(candidates) => value.elements().any(|e| candidates.contains(e)),
            Test::Always => true,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledClause {
    field: FieldRef,
    test: Test,
}

/// An executable predicate over records.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilter {
    clauses: Vec<CompiledClause>,
}

impl CompiledFilter {
    /// Returns `true` if the record satisfies every clause.
    pub fn matches<T: Record + ?Sized>(&self, record: &T) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.test.matches(&resolve(record, &clause.field)))
    }

    /// Returns `true` if this filter lets every record through.
    pub fn is_trivial(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of effective clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if there are no effective clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
