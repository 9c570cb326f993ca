//! Raw field values as borrowed from a record.
//!
//! The [`Value`] enum is what a [`Record`](crate::Record) hands to the engine
//! for a field. The same field may come back as a string on one record
//! (`"$1,250.00"`) and as a number on another; turning a raw value into
//! something comparable is the job of [`accessor`](crate::accessor).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// A field value borrowed from a record.
///
/// # Example
///
/// ```
/// use sift::{Number, Value};
///
/// struct Listing {
///     address: String,
///     beds: u32,
/// }
///
/// fn field<'a>(listing: &'a Listing, path: &str) -> Value<'a> {
///     match path {
///         "address" => Value::String(&listing.address),
///         "beds" => Value::Number(Number::from(listing.beds)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    /// Milliseconds since the Unix epoch.
    Timestamp(Timestamp),
    Bool(bool),
    /// Collection-valued field, e.g. a doctor's spoken languages.
    List(Vec<Value<'a>>),
    /// Absent, null, or of a shape the engine does not read.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` for [`Value::None`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` for collection-valued fields.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

/// A number as the record stores it.
///
/// Integers stay integers so that ids and counts display without a
/// trailing `.0`; the engine compares everything as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// The value as `f64`. Large integers lose precision.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => n.fmt(f),
            Number::U64(n) => n.fmt(f),
            Number::F64(n) => n.fmt(f),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Milliseconds since the Unix epoch, UTC.
///
/// Calendar dates map to midnight UTC, so a date and a datetime on the
/// same day compare in the obvious order.
///
/// ```
/// use chrono::NaiveDate;
/// use sift::Timestamp;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert!(Timestamp::from_date(day) < Timestamp::from_date(day.succ_opt().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Midnight UTC on `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        let millis = date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight).timestamp_millis())
            .unwrap_or(0);
        Timestamp(millis)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// `None` outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Timestamp::from_date(date)
    }
}
