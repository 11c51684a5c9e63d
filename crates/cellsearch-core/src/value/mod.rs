mod columns;
mod family;
mod json;
mod tag;

#[cfg(test)]
mod tests;

use rust_decimal::Decimal;
use std::net::IpAddr;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

// re-exports
pub use columns::Columns;
pub use family::CoercionFamily;
pub use tag::ValueTag;

pub(crate) use json::unknown_attribute;

///
/// Value
///
/// Raw cell value as handed over by the storage engine, and literal value
/// carried by search conditions.
///
/// Null      → the cell holds no value; every mapper coerces it to "nothing
///             indexed" rather than failing.
/// List      → list/set collection cells; each element is coerced and
///             indexed on its own.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// tinyint, smallint and int cells.
    Int(i32),
    /// bigint and counter cells.
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    Date(Date),
    Timestamp(OffsetDateTime),
    Blob(Vec<u8>),
    Uuid(Uuid),
    Inet(IpAddr),
    List(Vec<Self>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    /// Stable variant tag used in diagnostics.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    /// Coarse routing family used by the coercer.
    #[must_use]
    pub const fn coercion_family(&self) -> CoercionFamily {
        family::coercion_family(self)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.coercion_family(), CoercionFamily::Numeric)
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Null)
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    /// Canonical string representation of a scalar value.
    ///
    /// Returns `None` for `Null` and collections; callers coerce collection
    /// elements one by one.
    #[must_use]
    pub fn to_canonical_string(&self) -> Option<String> {
        let s = match self {
            Self::Null | Self::List(_) => return None,
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Long(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Double(f) => f.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.to_string(),
            Self::Timestamp(ts) => ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string()),
            Self::Blob(bytes) => hex::encode(bytes),
            Self::Uuid(u) => u.hyphenated().to_string(),
            Self::Inet(ip) => ip.to_string(),
        };

        Some(s)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<IpAddr> for Value {
    fn from(value: IpAddr) -> Self {
        Self::Inet(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
