//! Coercion-routing family classification for `Value`.
//!
//! Families are coarse routing categories only; each mapper still decides
//! which concrete variants it accepts.

use crate::value::Value;

///
/// CoercionFamily
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CoercionFamily {
    Numeric,    // Int, Long, Float, Double, Decimal
    Textual,    // Text
    Temporal,   // Date, Timestamp
    Binary,     // Blob
    Identifier, // Uuid, Inet
    Bool,
    Collection, // List
    Null,
}

pub(super) const fn coercion_family(value: &Value) -> CoercionFamily {
    match value {
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) | Value::Decimal(_) => {
            CoercionFamily::Numeric
        }
        Value::Text(_) => CoercionFamily::Textual,
        Value::Date(_) | Value::Timestamp(_) => CoercionFamily::Temporal,
        Value::Blob(_) => CoercionFamily::Binary,
        Value::Uuid(_) | Value::Inet(_) => CoercionFamily::Identifier,
        Value::Bool(_) => CoercionFamily::Bool,
        Value::List(_) => CoercionFamily::Collection,
        Value::Null => CoercionFamily::Null,
    }
}
