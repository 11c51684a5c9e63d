use crate::{error::IndexError, value::Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq};
use serde_json::{Number, Value as JsonValue};

///
/// JSON literal mapping
///
/// Condition values travel as plain JSON literals. Numbers keep their
/// integral/fractional distinction; every non-JSON-native variant is written
/// as its canonical string, which all mappers accept back.
///

impl Value {
    /// Decode a JSON literal into a raw value.
    pub fn from_json(json: &JsonValue) -> Result<Self, IndexError> {
        match json {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(b) => Ok(Self::Bool(*b)),
            JsonValue::Number(n) => Ok(number_to_value(n)),
            JsonValue::String(s) => Ok(Self::Text(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            JsonValue::Object(_) => Err(IndexError::serialization(
                "objects are not valid condition values",
            )),
        }
    }

    /// Encode this value as a JSON literal.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Long(i) => JsonValue::from(*i),
            Self::Float(f) => float_to_json(widen_f32(*f)),
            Self::Double(f) => float_to_json(*f),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            other => other
                .to_canonical_string()
                .map_or(JsonValue::Null, JsonValue::String),
        }
    }

    /// Rewrite this literal into the form `from_json` yields for it, so a
    /// literal held by a builder survives an encode/decode round trip.
    ///
    /// `Int` widens to `Long`, `Float` to the `Double` with the same shortest
    /// decimal form, and non-JSON-native scalars to their canonical text.
    /// Non-finite floats have no JSON number and become text as well.
    #[must_use]
    pub fn into_json_literal(self) -> Self {
        match self {
            Self::Null | Self::Bool(_) | Self::Long(_) | Self::Text(_) => self,
            Self::Int(i) => Self::Long(i64::from(i)),
            Self::Float(f) => fractional_literal(widen_f32(f)),
            Self::Double(f) => fractional_literal(f),
            Self::List(items) => {
                Self::List(items.into_iter().map(Self::into_json_literal).collect())
            }
            other => other.to_canonical_string().map_or(Self::Null, Self::Text),
        }
    }
}

// f32 → f64 through the shortest decimal form, so 0.7f32 becomes 0.7.
fn widen_f32(f: f32) -> f64 {
    f.to_string().parse().unwrap_or_else(|_| f64::from(f))
}

fn fractional_literal(f: f64) -> Value {
    if f.is_finite() {
        Value::Double(f)
    } else {
        Value::Text(f.to_string())
    }
}

/// First key of a tagged JSON object that is neither `type` nor in `allowed`.
pub(crate) fn unknown_attribute<'a>(json: &'a JsonValue, allowed: &[&str]) -> Option<&'a str> {
    json.as_object()?
        .keys()
        .map(String::as_str)
        .find(|key| *key != "type" && !allowed.contains(key))
}

#[expect(clippy::cast_precision_loss)]
fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Long(i)
    } else if let Some(u) = n.as_u64() {
        // only reached above i64::MAX
        Value::Double(u as f64)
    } else {
        Value::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn float_to_json(f: f64) -> JsonValue {
    Number::from_f64(f).map_or_else(|| JsonValue::String(f.to_string()), JsonValue::Number)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Long(i) => serializer.serialize_i64(*i),
            // f32 goes through the serializer directly so 0.7 stays 0.7
            Self::Float(f) if f.is_finite() => serializer.serialize_f32(*f),
            Self::Double(f) if f.is_finite() => serializer.serialize_f64(*f),
            Self::Float(f) => serializer.serialize_str(&f.to_string()),
            Self::Double(f) => serializer.serialize_str(&f.to_string()),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            other => match other.to_canonical_string() {
                Some(s) => serializer.serialize_str(&s),
                None => serializer.serialize_none(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Self::from_json(&json).map_err(serde::de::Error::custom)
    }
}
