use crate::{
    error::IndexError,
    obs::sink::{self, DecodeKind, MetricsEvent},
    search::condition::builder::{
        AllConditionBuilder, BooleanConditionBuilder, ConditionBuilder, ContainsConditionBuilder,
        FuzzyConditionBuilder, GeoBboxConditionBuilder, GeoDistanceConditionBuilder,
        MatchConditionBuilder, NoneConditionBuilder, PhraseConditionBuilder,
        PrefixConditionBuilder, RangeConditionBuilder, RegexpConditionBuilder,
        TermConditionBuilder, WildcardConditionBuilder,
    },
    value::unknown_attribute,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value as JsonValue;

///
/// Condition JSON codec
///
/// Encoding is the derived, `type`-tagged serde form of `ConditionBuilder`.
/// Decoding reads the `type` tag and dispatches through `DECODERS`; an
/// unknown tag is a hard error, never a fallback.
///

type DecodeFn = fn(JsonValue) -> Result<ConditionBuilder, IndexError>;

///
/// DECODERS
///
/// Tag → decoder registry. Must list every `ConditionBuilder` variant.
///

pub(crate) const DECODERS: &[(&str, DecodeFn)] = &[
    ("all", decode::<AllConditionBuilder>),
    ("none", decode::<NoneConditionBuilder>),
    ("boolean", decode::<BooleanConditionBuilder>),
    ("wildcard", decode::<WildcardConditionBuilder>),
    ("prefix", decode::<PrefixConditionBuilder>),
    ("regexp", decode::<RegexpConditionBuilder>),
    ("fuzzy", decode::<FuzzyConditionBuilder>),
    ("term", decode::<TermConditionBuilder>),
    ("match", decode::<MatchConditionBuilder>),
    ("phrase", decode::<PhraseConditionBuilder>),
    ("contains", decode::<ContainsConditionBuilder>),
    ("range", decode::<RangeConditionBuilder>),
    ("geo_bbox", decode::<GeoBboxConditionBuilder>),
    ("geo_distance", decode::<GeoDistanceConditionBuilder>),
];

///
/// Attributes
///
/// JSON attributes a condition builder accepts besides `type`. Anything else
/// in the object is rejected rather than dropped.
///

pub(crate) trait Attributes {
    const ATTRIBUTES: &'static [&'static str];
}

macro_rules! attributes {
    ($($builder:ident => [$($attribute:literal),* $(,)?]),* $(,)?) => {
        $(
            impl Attributes for $builder {
                const ATTRIBUTES: &'static [&'static str] = &[$($attribute),*];
            }
        )*
    };
}

attributes! {
    AllConditionBuilder => ["boost"],
    NoneConditionBuilder => ["boost"],
    BooleanConditionBuilder => ["boost", "must", "should", "not"],
    WildcardConditionBuilder => ["field", "value", "boost"],
    PrefixConditionBuilder => ["field", "value", "boost"],
    RegexpConditionBuilder => ["field", "value", "boost"],
    FuzzyConditionBuilder => [
        "field",
        "value",
        "max_edits",
        "prefix_length",
        "max_expansions",
        "transpositions",
        "boost",
    ],
    TermConditionBuilder => ["field", "value", "boost"],
    MatchConditionBuilder => ["field", "value", "boost"],
    PhraseConditionBuilder => ["field", "value", "slop", "boost"],
    ContainsConditionBuilder => ["field", "values", "boost"],
    RangeConditionBuilder => [
        "field",
        "lower",
        "upper",
        "include_lower",
        "include_upper",
        "boost",
    ],
    GeoBboxConditionBuilder => [
        "field",
        "min_latitude",
        "max_latitude",
        "min_longitude",
        "max_longitude",
        "boost",
    ],
    GeoDistanceConditionBuilder => [
        "field",
        "latitude",
        "longitude",
        "max_distance",
        "min_distance",
        "boost",
    ],
}

fn decode<T>(json: JsonValue) -> Result<ConditionBuilder, IndexError>
where
    T: Attributes + DeserializeOwned + Into<ConditionBuilder>,
{
    let tag = json
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();

    if let Some(key) = unknown_attribute(&json, T::ATTRIBUTES) {
        return Err(IndexError::serialization(format!(
            "unknown attribute '{key}' in {tag} condition"
        )));
    }

    serde_json::from_value::<T>(json)
        .map(Into::into)
        .map_err(|err| IndexError::serialization(format!("invalid {tag} condition: {err}")))
}

/// Look up the decoder registered for a tag.
pub(crate) fn decoder(tag: &str) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find_map(|(t, f)| (*t == tag).then_some(*f))
}

impl ConditionBuilder {
    /// Decode one condition object by its `type` tag.
    pub fn from_json_value(json: JsonValue) -> Result<Self, IndexError> {
        let tag = match json.get("type") {
            Some(JsonValue::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(IndexError::serialization(format!(
                    "condition type must be a string, found {other}"
                )));
            }
            None if json.is_object() => {
                return Err(IndexError::serialization(
                    "missing field `type` in condition",
                ));
            }
            None => {
                return Err(IndexError::serialization(format!(
                    "condition must be a JSON object, found {json}"
                )));
            }
        };

        let decode = decoder(&tag).ok_or_else(|| {
            IndexError::serialization(format!("unknown condition type '{tag}'"))
        })?;

        decode(json)
    }

    /// Decode a condition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let value: JsonValue = serde_json::from_str(json)?;
        let builder = Self::from_json_value(value)?;
        sink::record(MetricsEvent::JsonDecoded {
            kind: DecodeKind::Condition,
        });

        Ok(builder)
    }

    /// Encode this condition as JSON text; default-valued options are omitted.
    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string(self).map_err(IndexError::from)
    }
}

impl<'de> Deserialize<'de> for ConditionBuilder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(json).map_err(serde::de::Error::custom)
    }
}
