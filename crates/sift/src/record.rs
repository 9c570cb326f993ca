//! Record and schema traits.
//!
//! A listing view works over a collection of records whose shape is declared
//! once, as a [`Schema`]: the table of [`FieldRef`]s that queries may refer
//! to, plus the name of the identity field. Typed records get their schema
//! from `#[derive(Record)]` (see the `sift-macros` crate); schema-less JSON
//! records get theirs from a [`ViewConfig`](crate::ViewConfig).

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::accessor::display_text;
use crate::error::{QueryError, Result};
use crate::value::{Number, Timestamp, Value};

/// Trait for records a listing view can query.
///
/// Usually derived with `#[derive(Record)]`, but straightforward to
/// implement by hand:
///
/// ```
/// use sift::{Number, Record, Value};
///
/// struct Order {
///     number: String,
///     total: f64,
/// }
///
/// impl Record for Order {
///     fn field_value(&self, path: &str) -> Value<'_> {
///         match path {
///             "number" => Value::String(&self.number),
///             "total" => Value::Number(Number::F64(self.total)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the raw value at `path`, or [`Value::None`] if the record has
    /// no such field.
    fn field_value(&self, path: &str) -> Value<'_>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field_value(&self, path: &str) -> Value<'_> {
        (**self).field_value(path)
    }
}

/// A record type that carries its own schema.
///
/// Implemented by `#[derive(Record)]`.
pub trait Schematic: Record {
    /// The field table and identity field of this record type.
    fn schema() -> Schema;
}

/// Semantic type of a field, which decides how raw values are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, compared case-insensitively.
    #[serde(alias = "string")]
    Text,
    /// Plain number, possibly formatted (`"1,200"`).
    #[serde(alias = "number")]
    Numeric,
    /// Money amount, possibly formatted (`"$1,250.00"`).
    Currency,
    /// Enum-like string such as a status or category, compared case-insensitively.
    Enum,
    /// Date or datetime.
    #[serde(alias = "timestamp")]
    Date,
}

impl FieldType {
    /// Returns `true` for types with a meaningful numeric or chronological order.
    pub fn is_ordinal(self) -> bool {
        matches!(self, FieldType::Numeric | FieldType::Currency | FieldType::Date)
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Numeric => "numeric",
            FieldType::Currency => "currency",
            FieldType::Enum => "enum",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(FieldType::Text),
            "numeric" | "number" => Ok(FieldType::Numeric),
            "currency" => Ok(FieldType::Currency),
            "enum" => Ok(FieldType::Enum),
            "date" | "timestamp" => Ok(FieldType::Date),
            other => Err(format!(
                "unknown field type '{}'. Expected one of: text, numeric, currency, enum, date",
                other
            )),
        }
    }
}

/// A field name together with its semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Field path on the record. Dotted paths reach into nested objects.
    pub name: Cow<'static, str>,
    /// How values of this field are normalized.
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldRef {
    /// Creates a new field reference.
    pub fn new(name: impl Into<Cow<'static, str>>, ty: FieldType) -> Self {
        FieldRef {
            name: name.into(),
            ty,
        }
    }

    /// A [`FieldType::Text`] field.
    pub fn text(name: impl Into<Cow<'static, str>>) -> Self {
        FieldRef::new(name, FieldType::Text)
    }

    /// A [`FieldType::Numeric`] field.
    pub fn numeric(name: impl Into<Cow<'static, str>>) -> Self {
        FieldRef::new(name, FieldType::Numeric)
    }

    /// A [`FieldType::Currency`] field.
    pub fn currency(name: impl Into<Cow<'static, str>>) -> Self {
        FieldRef::new(name, FieldType::Currency)
    }

    /// A [`FieldType::Enum`] field.
    pub fn enumeration(name: impl Into<Cow<'static, str>>) -> Self {
        FieldRef::new(name, FieldType::Enum)
    }

    /// A [`FieldType::Date`] field.
    pub fn date(name: impl Into<Cow<'static, str>>) -> Self {
        FieldRef::new(name, FieldType::Date)
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The field table of a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    id_field: Cow<'static, str>,
    fields: Vec<FieldRef>,
}

impl Schema {
    /// Creates a schema from its identity field and its queryable fields.
    pub fn new(
        id_field: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = FieldRef>,
    ) -> Self {
        Schema {
            id_field: id_field.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Name of the field holding each record's stable unique identifier.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldRef] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldRef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the identifier of `record`, rendered as a string.
    ///
    /// This text is the record's identity: ids are compared as text, so a
    /// numeric `1` and a string `"1"` name the same record.
    pub fn record_id<T: Record + ?Sized>(&self, record: &T) -> Option<String> {
        display_text(&record.field_value(&self.id_field))
    }

    /// Checks that every record carries an identifier and that no two share one.
    ///
    /// Ids are compared by their [`record_id`](Self::record_id) text.
    pub fn validate_ids<T: Record>(&self, collection: &[T]) -> Result<()> {
        let mut seen = HashSet::with_capacity(collection.len());
        for (index, record) in collection.iter().enumerate() {
            let id = self
                .record_id(record)
                .ok_or(QueryError::MissingRecordId { index })?;
            if !seen.insert(id.clone()) {
                return Err(QueryError::DuplicateRecordId { id });
            }
        }
        Ok(())
    }
}

/// Conversion of a field's Rust type into a raw [`Value`].
///
/// Used by `#[derive(Record)]` for every annotated field, so any field type
/// implementing this trait can be declared on a record.
pub trait AsValue {
    /// Borrows this field as a raw value.
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! as_value_number {
    ($($t:ty),*) => {
        $(
            impl AsValue for $t {
                fn as_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

as_value_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl AsValue for Timestamp {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl AsValue for NaiveDate {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from_date(*self))
    }
}

impl<Tz: TimeZone> AsValue for DateTime<Tz> {
    fn as_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp(self.timestamp_millis()))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.as_value(),
            None => Value::None,
        }
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl AsValue for serde_json::Value {
    fn as_value(&self) -> Value<'_> {
        json_value(self)
    }
}

/// Schema-less records: `path` is a dotted path into nested objects, and a
/// numeric segment indexes into an array (`"languages.0"`).
impl Record for serde_json::Value {
    fn field_value(&self, path: &str) -> Value<'_> {
        let mut current = self;
        for segment in path.split('.') {
            let next = match current {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Value::None,
            }
        }
        json_value(current)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field_value(&self, path: &str) -> Value<'_> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        match (self.get(head), rest) {
            (Some(value), Some(rest)) => value.field_value(rest),
            (Some(value), None) => json_value(value),
            (None, _) => Value::None,
        }
    }
}

fn json_value(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map(|f| Value::Number(Number::F64(f)))
                    .unwrap_or(Value::None)
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.iter().map(json_value).collect()),
        // Nested objects are not comparable; reach into them with a dotted path.
        serde_json::Value::Object(_) => Value::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_dotted_paths() {
        let doctor = json!({
            "id": "d-1",
            "name": "Dr. Ana Ruiz",
            "address": { "city": "Austin", "zip": "78701" },
            "languages": ["English", "Spanish"],
            "rating": 4.8,
            "retired": null
        });

        assert_eq!(doctor.field_value("name"), Value::String("Dr. Ana Ruiz"));
        assert_eq!(doctor.field_value("address.city"), Value::String("Austin"));
        assert_eq!(
            doctor.field_value("languages"),
            Value::List(vec![Value::String("English"), Value::String("Spanish")])
        );
        assert_eq!(doctor.field_value("languages.1"), Value::String("Spanish"));
        assert_eq!(
            doctor.field_value("rating"),
            Value::Number(Number::F64(4.8))
        );
        assert_eq!(doctor.field_value("retired"), Value::None);
        assert_eq!(doctor.field_value("address"), Value::None);
        assert_eq!(doctor.field_value("name.first"), Value::None);
        assert_eq!(doctor.field_value("missing"), Value::None);
    }

    #[test]
    fn json_map_records() {
        let value = json!({ "owner": { "name": "Kim" }, "units": 12 });
        let map = value.as_object().unwrap();
        assert_eq!(map.field_value("owner.name"), Value::String("Kim"));
        assert_eq!(map.field_value("units"), Value::Number(Number::I64(12)));
        assert_eq!(map.field_value("nope.name"), Value::None);
    }

    #[test]
    fn as_value_for_field_types() {
        assert_eq!("x".to_string().as_value(), Value::String("x"));
        assert_eq!(3u8.as_value(), Value::Number(Number::U64(3)));
        assert_eq!(Some(true).as_value(), Value::Bool(true));
        assert_eq!(None::<String>.as_value(), Value::None);
        assert_eq!(
            vec![1i32, 2].as_value(),
            Value::List(vec![
                Value::Number(Number::I64(1)),
                Value::Number(Number::I64(2))
            ])
        );
        let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date.as_value(), Value::Timestamp(Timestamp(0)));
    }

    #[test]
    fn field_type_parsing() {
        assert_eq!("currency".parse::<FieldType>(), Ok(FieldType::Currency));
        assert_eq!(" Number ".parse::<FieldType>(), Ok(FieldType::Numeric));
        assert!("money".parse::<FieldType>().is_err());
        assert!(FieldType::Date.is_ordinal());
        assert!(!FieldType::Enum.is_ordinal());
    }

    #[test]
    fn schema_lookup() {
        let schema = Schema::new(
            "id",
            [FieldRef::text("name"), FieldRef::currency("monthlyPremium")],
        );
        assert_eq!(schema.id_field(), "id");
        assert_eq!(
            schema.field("monthlyPremium").map(|f| f.ty),
            Some(FieldType::Currency)
        );
        assert!(schema.field("unknown").is_none());
    }

    #[test]
    fn validate_ids_rejects_missing_and_duplicates() {
        let schema = Schema::new("id", [FieldRef::text("name")]);

        let ok = vec![json!({"id": 1}), json!({"id": "2"})];
        assert!(schema.validate_ids(&ok).is_ok());

        let missing = vec![json!({"id": 1}), json!({"name": "x"})];
        assert!(matches!(
            schema.validate_ids(&missing),
            Err(QueryError::MissingRecordId { index: 1 })
        ));

        let duplicate = vec![json!({"id": "a"}), json!({"id": "a"})];
        assert!(matches!(
            schema.validate_ids(&duplicate),
            Err(QueryError::DuplicateRecordId { ref id }) if id == "a"
        ));
    }

    #[test]
    fn ids_are_compared_as_text() {
        let schema = Schema::new("id", [FieldRef::text("name")]);

        assert_eq!(schema.record_id(&json!({"id": 1})).as_deref(), Some("1"));
        assert_eq!(schema.record_id(&json!({"id": "1"})).as_deref(), Some("1"));

        let mixed = vec![json!({"id": 1}), json!({"id": "1"})];
        assert!(matches!(
            schema.validate_ids(&mixed),
            Err(QueryError::DuplicateRecordId { ref id }) if id == "1"
        ));

        let case = vec![json!({"id": "a"}), json!({"id": "A"})];
        assert!(schema.validate_ids(&case).is_ok());
    }
}
