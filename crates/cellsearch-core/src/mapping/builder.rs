use crate::{
    error::IndexError,
    mapping::{
        Mapper,
        kind::{
            DEFAULT_CASE_SENSITIVE, DEFAULT_DATE_PATTERN, DEFAULT_DECIMAL_DIGITS,
            DEFAULT_GEO_MAX_LEVELS, DEFAULT_INTEGER_DIGITS, MapperKind,
        },
    },
    obs::sink::{self, DecodeKind, MetricsEvent},
    value::unknown_attribute,
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;

// JSON attributes of `MapperOptions`, accepted by every mapper type.
const OPTION_ATTRIBUTES: &[&str] = &["indexed", "sorted", "column", "boost"];

// Common option setters shared by every builder type.
macro_rules! option_setters {
    () => {
        #[must_use]
        pub fn indexed(mut self, indexed: bool) -> Self {
            self.options_mut().indexed = Some(indexed);
            self
        }

        #[must_use]
        pub fn sorted(mut self, sorted: bool) -> Self {
            self.options_mut().sorted = Some(sorted);
            self
        }

        #[must_use]
        pub fn column(mut self, column: impl Into<String>) -> Self {
            self.options_mut().column = Some(column.into());
            self
        }

        #[must_use]
        pub fn boost(mut self, boost: f32) -> Self {
            self.options_mut().boost = Some(boost);
            self
        }
    };
}

///
/// MapperOptions
///
/// Options common to every mapper. Unset options are omitted from JSON and
/// resolve to their defaults at build time.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MapperOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

///
/// MapperBuilder
///
/// Mutable, JSON-serializable staging form of a `Mapper`.
/// The JSON `type` tag selects the variant; decoding dispatches on it by hand
/// so that unknown attributes are rejected.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapperBuilder {
    Integer(MapperOptions),
    Long(MapperOptions),
    Float(MapperOptions),
    Double(MapperOptions),
    #[serde(rename = "bigdec")]
    BigDecimal(BigDecimalMapperBuilder),
    String(StringMapperBuilder),
    Text(TextMapperBuilder),
    Boolean(MapperOptions),
    Date(DateMapperBuilder),
    Blob(MapperOptions),
    Inet(MapperOptions),
    Uuid(MapperOptions),
    GeoPoint(GeoPointMapperBuilder),
}

impl MapperBuilder {
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer(MapperOptions::default())
    }

    #[must_use]
    pub fn long() -> Self {
        Self::Long(MapperOptions::default())
    }

    #[must_use]
    pub fn float() -> Self {
        Self::Float(MapperOptions::default())
    }

    #[must_use]
    pub fn double() -> Self {
        Self::Double(MapperOptions::default())
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean(MapperOptions::default())
    }

    #[must_use]
    pub fn blob() -> Self {
        Self::Blob(MapperOptions::default())
    }

    #[must_use]
    pub fn inet() -> Self {
        Self::Inet(MapperOptions::default())
    }

    #[must_use]
    pub fn uuid() -> Self {
        Self::Uuid(MapperOptions::default())
    }

    #[must_use]
    pub fn bigdec() -> BigDecimalMapperBuilder {
        BigDecimalMapperBuilder::default()
    }

    #[must_use]
    pub fn string() -> StringMapperBuilder {
        StringMapperBuilder::default()
    }

    #[must_use]
    pub fn text() -> TextMapperBuilder {
        TextMapperBuilder::default()
    }

    #[must_use]
    pub fn date() -> DateMapperBuilder {
        DateMapperBuilder::default()
    }

    #[must_use]
    pub fn geo_point(latitude: impl Into<String>, longitude: impl Into<String>) -> GeoPointMapperBuilder {
        GeoPointMapperBuilder {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            ..GeoPointMapperBuilder::default()
        }
    }

    option_setters!();

    #[must_use]
    pub const fn options(&self) -> &MapperOptions {
        match self {
            Self::Integer(o)
            | Self::Long(o)
            | Self::Float(o)
            | Self::Double(o)
            | Self::Boolean(o)
            | Self::Blob(o)
            | Self::Inet(o)
            | Self::Uuid(o) => o,
            Self::BigDecimal(b) => &b.options,
            Self::String(b) => &b.options,
            Self::Text(b) => &b.options,
            Self::Date(b) => &b.options,
            Self::GeoPoint(b) => &b.options,
        }
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        match self {
            Self::Integer(o)
            | Self::Long(o)
            | Self::Float(o)
            | Self::Double(o)
            | Self::Boolean(o)
            | Self::Blob(o)
            | Self::Inet(o)
            | Self::Uuid(o) => o,
            Self::BigDecimal(b) => &mut b.options,
            Self::String(b) => &mut b.options,
            Self::Text(b) => &mut b.options,
            Self::Date(b) => &mut b.options,
            Self::GeoPoint(b) => &mut b.options,
        }
    }

    /// Resolve the variant and its options, applying defaults.
    fn kind(&self) -> MapperKind {
        match self {
            Self::Integer(_) => MapperKind::Integer,
            Self::Long(_) => MapperKind::Long,
            Self::Float(_) => MapperKind::Float,
            Self::Double(_) => MapperKind::Double,
            Self::BigDecimal(b) => MapperKind::BigDecimal {
                integer_digits: b.integer_digits.unwrap_or(DEFAULT_INTEGER_DIGITS),
                decimal_digits: b.decimal_digits.unwrap_or(DEFAULT_DECIMAL_DIGITS),
            },
            Self::String(b) => MapperKind::String {
                case_sensitive: b.case_sensitive.unwrap_or(DEFAULT_CASE_SENSITIVE),
            },
            Self::Text(b) => MapperKind::Text {
                analyzer: b.analyzer.clone(),
            },
            Self::Boolean(_) => MapperKind::Boolean,
            Self::Date(b) => MapperKind::Date {
                pattern: b
                    .pattern
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string()),
            },
            Self::Blob(_) => MapperKind::Blob,
            Self::Inet(_) => MapperKind::Inet,
            Self::Uuid(_) => MapperKind::Uuid,
            Self::GeoPoint(b) => MapperKind::GeoPoint {
                latitude: b.latitude.clone().unwrap_or_default(),
                longitude: b.longitude.clone().unwrap_or_default(),
                max_levels: b.max_levels.unwrap_or(DEFAULT_GEO_MAX_LEVELS),
            },
        }
    }

    /// Validate and build the immutable mapper for `field`.
    pub fn build(&self, field: &str) -> Result<Mapper, IndexError> {
        Mapper::new(field, self.options(), self.kind())
    }

    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string(self).map_err(IndexError::from)
    }

    /// Decode one mapper object by its `type` tag.
    pub fn from_json_value(json: JsonValue) -> Result<Self, IndexError> {
        let tag = match json.get("type") {
            Some(JsonValue::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(IndexError::serialization(format!(
                    "mapper type must be a string, found {other}"
                )));
            }
            None => return Err(IndexError::serialization("missing field `type` in mapper")),
        };

        match tag.as_str() {
            "integer" => decode_variant(&tag, json, &[], Self::Integer),
            "long" => decode_variant(&tag, json, &[], Self::Long),
            "float" => decode_variant(&tag, json, &[], Self::Float),
            "double" => decode_variant(&tag, json, &[], Self::Double),
            "bigdec" => decode_variant(
                &tag,
                json,
                &["integer_digits", "decimal_digits"],
                Self::BigDecimal,
            ),
            "string" => decode_variant(&tag, json, &["case_sensitive"], Self::String),
            "text" => decode_variant(&tag, json, &["analyzer"], Self::Text),
            "boolean" => decode_variant(&tag, json, &[], Self::Boolean),
            "date" => decode_variant(&tag, json, &["pattern"], Self::Date),
            "blob" => decode_variant(&tag, json, &[], Self::Blob),
            "inet" => decode_variant(&tag, json, &[], Self::Inet),
            "uuid" => decode_variant(&tag, json, &[], Self::Uuid),
            "geo_point" => decode_variant(
                &tag,
                json,
                &["latitude", "longitude", "max_levels"],
                Self::GeoPoint,
            ),
            _ => Err(IndexError::serialization(format!(
                "unknown mapper type '{tag}'"
            ))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let value: JsonValue = serde_json::from_str(json)?;
        let builder = Self::from_json_value(value)?;
        sink::record(MetricsEvent::JsonDecoded {
            kind: DecodeKind::Mapper,
        });

        Ok(builder)
    }
}

// Reject keys outside the common options and `extra`, then deserialize the
// variant's own builder.
fn decode_variant<T: DeserializeOwned>(
    tag: &str,
    json: JsonValue,
    extra: &[&str],
    variant: fn(T) -> MapperBuilder,
) -> Result<MapperBuilder, IndexError> {
    let allowed: Vec<&str> = OPTION_ATTRIBUTES.iter().chain(extra).copied().collect();
    if let Some(key) = unknown_attribute(&json, &allowed) {
        return Err(IndexError::serialization(format!(
            "unknown attribute '{key}' in {tag} mapper"
        )));
    }

    serde_json::from_value::<T>(json)
        .map(variant)
        .map_err(|err| IndexError::serialization(format!("invalid {tag} mapper: {err}")))
}

impl<'de> Deserialize<'de> for MapperBuilder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(json).map_err(serde::de::Error::custom)
    }
}

///
/// BigDecimalMapperBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BigDecimalMapperBuilder {
    #[serde(flatten)]
    pub options: MapperOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_digits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_digits: Option<u32>,
}

impl BigDecimalMapperBuilder {
    option_setters!();

    #[must_use]
    pub const fn integer_digits(mut self, digits: u32) -> Self {
        self.integer_digits = Some(digits);
        self
    }

    #[must_use]
    pub const fn decimal_digits(mut self, digits: u32) -> Self {
        self.decimal_digits = Some(digits);
        self
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        &mut self.options
    }
}

///
/// StringMapperBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StringMapperBuilder {
    #[serde(flatten)]
    pub options: MapperOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

impl StringMapperBuilder {
    option_setters!();

    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        &mut self.options
    }
}

///
/// TextMapperBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TextMapperBuilder {
    #[serde(flatten)]
    pub options: MapperOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

impl TextMapperBuilder {
    option_setters!();

    #[must_use]
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        &mut self.options
    }
}

///
/// DateMapperBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DateMapperBuilder {
    #[serde(flatten)]
    pub options: MapperOptions,
    /// `time` format description, e.g. `[year]-[month]-[day]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl DateMapperBuilder {
    option_setters!();

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        &mut self.options
    }
}

///
/// GeoPointMapperBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GeoPointMapperBuilder {
    #[serde(flatten)]
    pub options: MapperOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_levels: Option<u8>,
}

impl GeoPointMapperBuilder {
    option_setters!();

    #[must_use]
    pub const fn max_levels(mut self, max_levels: u8) -> Self {
        self.max_levels = Some(max_levels);
        self
    }

    const fn options_mut(&mut self) -> &mut MapperOptions {
        &mut self.options
    }
}

// Variant builders convert into the tagged enum and build through it.
macro_rules! variant_builder {
    ($builder:ident, $variant:ident) => {
        impl From<$builder> for MapperBuilder {
            fn from(builder: $builder) -> Self {
                Self::$variant(builder)
            }
        }

        impl $builder {
            pub fn build(self, field: &str) -> Result<Mapper, IndexError> {
                MapperBuilder::from(self).build(field)
            }
        }
    };
}

variant_builder!(BigDecimalMapperBuilder, BigDecimal);
variant_builder!(StringMapperBuilder, String);
variant_builder!(TextMapperBuilder, Text);
variant_builder!(DateMapperBuilder, Date);
variant_builder!(GeoPointMapperBuilder, GeoPoint);
