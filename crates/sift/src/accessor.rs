//! Field resolution and value normalization.
//!
//! Every comparison the engine makes goes through [`resolve`], which reads a
//! raw [`Value`] off a record and normalizes it according to the field's
//! [`FieldType`]:
//!
//! | Type | Raw input | Normalized |
//! |------|-----------|------------|
//! | `text`, `enum` | any scalar | lowercased string |
//! | `numeric`, `currency` | number, or formatted string (`"$1,250.00"`) | `f64` |
//! | `date` | timestamp, epoch millis, or date string | [`Timestamp`] |
//!
//! Anything that fails to parse, blank strings, `NaN`, and absent fields all
//! become [`Normalized::Missing`]. Missing is a value, not an error: range
//! filters never match it and sorting always puts it last.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::record::{FieldRef, FieldType, Record};
use crate::value::{Number, Timestamp, Value};

const MILLIS_PER_DAY: i64 = 86_400_000;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// A field value normalized for comparison.
///
/// `Normalized` has a total order (see [`Normalized::total_cmp`]), so it can
/// key sorted maps and sort without fallbacks.
#[derive(Debug, Clone)]
pub enum Normalized {
    /// Lowercased text.
    Text(String),
    /// Finite number. `-0.0` is stored as `0.0`.
    Number(f64),
    /// Point in time.
    Instant(Timestamp),
    /// Boolean.
    Bool(bool),
    /// Non-empty collection of normalized elements.
    List(Vec<Normalized>),
    /// Absent or unparsable.
    Missing,
}

impl Normalized {
    /// Returns `true` if this value is [`Normalized::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Normalized::Missing)
    }

    /// Iterates the comparable elements of this value.
    ///
    /// A scalar yields itself, a list yields its elements, and `Missing`
    /// yields nothing.
    pub fn elements(&self) -> Box<dyn Iterator<Item = &Normalized> + '_> {
        match self {
            Normalized::List(items) => Box::new(items.iter()),
            Normalized::Missing => Box::new(std::iter::empty()),
            scalar => Box::new(std::iter::once(scalar)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Normalized::Bool(_) => 0,
            Normalized::Number(_) => 1,
            Normalized::Instant(_) => 2,
            Normalized::Text(_) => 3,
            Normalized::List(_) => 4,
            Normalized::Missing => 5,
        }
    }

    /// Total order over normalized values.
    ///
    /// Values of the same kind compare naturally (lists lexicographically).
    /// Values of different kinds compare by kind:
    /// `Bool < Number < Instant < Text < List < Missing`.
    pub fn total_cmp(&self, other: &Normalized) -> Ordering {
        match (self, other) {
            (Normalized::Text(a), Normalized::Text(b)) => a.cmp(b),
            (Normalized::Number(a), Normalized::Number(b)) => a.total_cmp(b),
            (Normalized::Instant(a), Normalized::Instant(b)) => a.cmp(b),
            (Normalized::Bool(a), Normalized::Bool(b)) => a.cmp(b),
            (Normalized::List(a), Normalized::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ordering = x.total_cmp(y);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialEq for Normalized {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Normalized {}

impl PartialOrd for Normalized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Normalized {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

/// Reads `field` off `record` and normalizes it.
pub fn resolve<T: Record + ?Sized>(record: &T, field: &FieldRef) -> Normalized {
    normalize(&record.field_value(&field.name), field.ty)
}

/// Normalizes a raw value under a field type.
pub fn normalize(value: &Value<'_>, ty: FieldType) -> Normalized {
    match value {
        Value::None => Normalized::Missing,
        Value::List(items) => {
            let elements: Vec<Normalized> = items
                .iter()
                .map(|item| normalize(item, ty))
                .filter(|n| !n.is_missing())
                .collect();
            if elements.is_empty() {
                Normalized::Missing
            } else {
                Normalized::List(elements)
            }
        }
        scalar => match ty {
            FieldType::Text | FieldType::Enum => display_text(scalar)
                .map(|s| Normalized::Text(s.to_lowercase()))
                .unwrap_or(Normalized::Missing),
            FieldType::Numeric | FieldType::Currency => number_of(scalar)
                .map(Normalized::Number)
                .unwrap_or(Normalized::Missing),
            FieldType::Date => instant_of(scalar)
                .map(Normalized::Instant)
                .unwrap_or(Normalized::Missing),
        },
    }
}

/// Display form of a raw value, with original casing.
///
/// Blank strings and `None` have no display form.
pub fn display_text(value: &Value<'_>) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some((*s).to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Timestamp(ts) => Some(format_timestamp(*ts)),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::None => None,
    }
}

/// Lowercased display form of a raw value, as matched by free-text search.
pub fn search_text(value: &Value<'_>) -> Option<String> {
    display_text(value).map(|text| text.to_lowercase())
}

/// Parses a formatted number such as `"$1,250.00"`, `"12%"` or `"-3"`.
///
/// Reads the first number in `s`, dropping thousands separators and any
/// surrounding symbols or units. A `-` anywhere before it makes it negative.
/// A string holding a second number (`"$150 - $200"`) is ambiguous and
/// yields `None`.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit() || c == '.')?;
    let negative = s[..start].contains('-');

    let rest = &s[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(rest.len());
    let mut number: String = rest[..end].chars().filter(|&c| c != ',').collect();
    let mut tail = &rest[end..];
    if let Some(exp) = exponent(tail) {
        number.push_str(exp);
        tail = &tail[exp.len()..];
    }
    if tail.contains(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let magnitude: f64 = number.parse().ok()?;
    finite(if negative { -magnitude } else { magnitude })
}

/// The `e[+-]digits` prefix of `s`, if any.
fn exponent(s: &str) -> Option<&str> {
    let body = s.strip_prefix(|c: char| c == 'e' || c == 'E')?;
    let unsigned = body.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(body);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    Some(&s[..s.len() - unsigned.len() + digits])
}

/// Parses a date or datetime string. Naive values are read as UTC.
pub fn parse_date(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Timestamp(Utc.from_utc_datetime(&naive).timestamp_millis()));
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .map(Timestamp::from_date)
}

fn number_of(value: &Value<'_>) -> Option<f64> {
    match value {
        Value::Number(n) => finite(n.as_f64()),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

fn instant_of(value: &Value<'_>) -> Option<Timestamp> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Number(Number::I64(n)) => Some(Timestamp(*n)),
        Value::Number(Number::U64(n)) => i64::try_from(*n).ok().map(Timestamp),
        Value::Number(Number::F64(n)) if n.is_finite() => Some(Timestamp(*n as i64)),
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

fn finite(n: f64) -> Option<f64> {
    if !n.is_finite() {
        None
    } else if n == 0.0 {
        Some(0.0)
    } else {
        Some(n)
    }
}

fn format_timestamp(ts: Timestamp) -> String {
    match ts.to_datetime() {
        Some(dt) if ts.0 % MILLIS_PER_DAY == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => ts.0.to_string(),
    }
}
