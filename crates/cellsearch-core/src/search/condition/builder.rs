use crate::{
    DEFAULT_BOOST,
    error::IndexError,
    mapping::geo,
    search::condition::{
        ast::{
            BooleanCondition, Condition, ConditionKind, FuzzyCondition, GeoBboxCondition,
            GeoDistanceCondition, RangeCondition,
        },
        distance::GeoDistance,
    },
    value::Value,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_EDITS: u8 = 2;
pub const MAX_EDITS_LIMIT: u8 = 2;
pub const DEFAULT_PREFIX_LENGTH: u32 = 0;
pub const DEFAULT_MAX_EXPANSIONS: u32 = 50;
pub const DEFAULT_TRANSPOSITIONS: bool = true;
pub const DEFAULT_SLOP: u32 = 0;
pub const DEFAULT_INCLUDE_LOWER: bool = false;
pub const DEFAULT_INCLUDE_UPPER: bool = false;

///
/// ConditionBuilder
///
/// Mutable staging form of a `Condition`, one variant per condition kind.
/// Encodes with a `type` tag; decoding goes through the explicit tag
/// registry in `json`.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionBuilder {
    All(AllConditionBuilder),
    None(NoneConditionBuilder),
    Boolean(BooleanConditionBuilder),
    Wildcard(WildcardConditionBuilder),
    Prefix(PrefixConditionBuilder),
    Regexp(RegexpConditionBuilder),
    Fuzzy(FuzzyConditionBuilder),
    Term(TermConditionBuilder),
    Match(MatchConditionBuilder),
    Phrase(PhraseConditionBuilder),
    Contains(ContainsConditionBuilder),
    Range(RangeConditionBuilder),
    GeoBbox(GeoBboxConditionBuilder),
    GeoDistance(GeoDistanceConditionBuilder),
}

impl ConditionBuilder {
    ///
    /// CONSTRUCTION
    ///

    #[must_use]
    pub fn all() -> AllConditionBuilder {
        AllConditionBuilder::default()
    }

    #[must_use]
    pub fn none() -> NoneConditionBuilder {
        NoneConditionBuilder::default()
    }

    #[must_use]
    pub fn boolean() -> BooleanConditionBuilder {
        BooleanConditionBuilder::default()
    }

    #[must_use]
    pub fn wildcard(field: impl Into<String>, value: impl Into<String>) -> WildcardConditionBuilder {
        WildcardConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> PrefixConditionBuilder {
        PrefixConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn regexp(field: impl Into<String>, value: impl Into<String>) -> RegexpConditionBuilder {
        RegexpConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn fuzzy(field: impl Into<String>, value: impl Into<String>) -> FuzzyConditionBuilder {
        FuzzyConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> TermConditionBuilder {
        TermConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn match_(field: impl Into<String>, value: impl Into<Value>) -> MatchConditionBuilder {
        MatchConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn phrase(field: impl Into<String>, value: impl Into<String>) -> PhraseConditionBuilder {
        PhraseConditionBuilder::new(field, value)
    }

    #[must_use]
    pub fn contains<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> ContainsConditionBuilder {
        ContainsConditionBuilder::new(field, values)
    }

    #[must_use]
    pub fn range(field: impl Into<String>) -> RangeConditionBuilder {
        RangeConditionBuilder::new(field)
    }

    #[must_use]
    pub fn geo_bbox(
        field: impl Into<String>,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> GeoBboxConditionBuilder {
        GeoBboxConditionBuilder {
            field: field.into(),
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
            boost: None,
        }
    }

    #[must_use]
    pub fn geo_distance(
        field: impl Into<String>,
        latitude: f64,
        longitude: f64,
        max_distance: impl Into<String>,
    ) -> GeoDistanceConditionBuilder {
        GeoDistanceConditionBuilder {
            field: field.into(),
            latitude,
            longitude,
            max_distance: max_distance.into(),
            min_distance: None,
            boost: None,
        }
    }

    ///
    /// INTROSPECTION
    ///

    /// JSON `type` tag of this variant.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::All(_) => "all",
            Self::None(_) => "none",
            Self::Boolean(_) => "boolean",
            Self::Wildcard(_) => "wildcard",
            Self::Prefix(_) => "prefix",
            Self::Regexp(_) => "regexp",
            Self::Fuzzy(_) => "fuzzy",
            Self::Term(_) => "term",
            Self::Match(_) => "match",
            Self::Phrase(_) => "phrase",
            Self::Contains(_) => "contains",
            Self::Range(_) => "range",
            Self::GeoBbox(_) => "geo_bbox",
            Self::GeoDistance(_) => "geo_distance",
        }
    }

    ///
    /// BUILD
    ///

    /// Validate and produce the immutable condition.
    pub fn build(self) -> Result<Condition, IndexError> {
        match self {
            Self::All(b) => b.build(),
            Self::None(b) => b.build(),
            Self::Boolean(b) => b.build(),
            Self::Wildcard(b) => b.build(),
            Self::Prefix(b) => b.build(),
            Self::Regexp(b) => b.build(),
            Self::Fuzzy(b) => b.build(),
            Self::Term(b) => b.build(),
            Self::Match(b) => b.build(),
            Self::Phrase(b) => b.build(),
            Self::Contains(b) => b.build(),
            Self::Range(b) => b.build(),
            Self::GeoBbox(b) => b.build(),
            Self::GeoDistance(b) => b.build(),
        }
    }
}

///
/// VALIDATION
///

fn check_boost(tag: &str, boost: Option<f32>) -> Result<f32, IndexError> {
    let boost = boost.unwrap_or(DEFAULT_BOOST);
    if boost.is_finite() && boost > 0.0 {
        Ok(boost)
    } else {
        Err(IndexError::condition(format!(
            "{tag} condition boost must be positive and finite, found {boost}"
        )))
    }
}

fn require_text(tag: &str, attribute: &str, text: String) -> Result<String, IndexError> {
    if text.trim().is_empty() {
        Err(IndexError::condition(format!(
            "{tag} condition requires a non-empty '{attribute}'"
        )))
    } else {
        Ok(text)
    }
}

fn require_value(tag: &str, attribute: &str, value: Value) -> Result<Value, IndexError> {
    if value.is_null() {
        Err(IndexError::condition(format!(
            "{tag} condition requires a non-null '{attribute}'"
        )))
    } else {
        Ok(value)
    }
}

fn literal(value: impl Into<Value>) -> Value {
    let value: Value = value.into();
    value.into_json_literal()
}

fn check_coordinates(tag: &str, latitude: f64, longitude: f64) -> Result<(), IndexError> {
    if !geo::is_valid_latitude(latitude) {
        return Err(IndexError::condition(format!(
            "{tag} condition latitude must be in [-90, 90], found {latitude}"
        )));
    }
    if !geo::is_valid_longitude(longitude) {
        return Err(IndexError::condition(format!(
            "{tag} condition longitude must be in [-180, 180], found {longitude}"
        )));
    }

    Ok(())
}

// Shared boost setter.
macro_rules! boost_setter {
    () => {
        #[must_use]
        pub const fn boost(mut self, boost: f32) -> Self {
            self.boost = Some(boost);
            self
        }
    };
}

// Every variant builder converts into `ConditionBuilder`.
macro_rules! into_condition_builder {
    ($($builder:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$builder> for ConditionBuilder {
                fn from(builder: $builder) -> Self {
                    Self::$variant(builder)
                }
            }
        )*
    };
}

into_condition_builder! {
    AllConditionBuilder => All,
    NoneConditionBuilder => None,
    BooleanConditionBuilder => Boolean,
    WildcardConditionBuilder => Wildcard,
    PrefixConditionBuilder => Prefix,
    RegexpConditionBuilder => Regexp,
    FuzzyConditionBuilder => Fuzzy,
    TermConditionBuilder => Term,
    MatchConditionBuilder => Match,
    PhraseConditionBuilder => Phrase,
    ContainsConditionBuilder => Contains,
    RangeConditionBuilder => Range,
    GeoBboxConditionBuilder => GeoBbox,
    GeoDistanceConditionBuilder => GeoDistance,
}

///
/// AllConditionBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AllConditionBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl AllConditionBuilder {
    boost_setter!();

    pub fn build(self) -> Result<Condition, IndexError> {
        Ok(Condition::new(ConditionKind::All, check_boost("all", self.boost)?))
    }
}

///
/// NoneConditionBuilder
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NoneConditionBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl NoneConditionBuilder {
    boost_setter!();

    pub fn build(self) -> Result<Condition, IndexError> {
        Ok(Condition::new(ConditionKind::None, check_boost("none", self.boost)?))
    }
}

///
/// BooleanConditionBuilder
///
/// The three clause lists are always encoded, even when empty.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BooleanConditionBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default)]
    pub must: Vec<ConditionBuilder>,
    #[serde(default)]
    pub should: Vec<ConditionBuilder>,
    #[serde(default)]
    pub not: Vec<ConditionBuilder>,
}

impl BooleanConditionBuilder {
    boost_setter!();

    #[must_use]
    pub fn must(mut self, condition: impl Into<ConditionBuilder>) -> Self {
        self.must.push(condition.into());
        self
    }

    #[must_use]
    pub fn should(mut self, condition: impl Into<ConditionBuilder>) -> Self {
        self.should.push(condition.into());
        self
    }

    #[must_use]
    pub fn not(mut self, condition: impl Into<ConditionBuilder>) -> Self {
        self.not.push(condition.into());
        self
    }

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("boolean", self.boost)?;
        let build_all = |items: Vec<ConditionBuilder>| {
            items
                .into_iter()
                .map(ConditionBuilder::build)
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Condition::new(
            ConditionKind::Boolean(BooleanCondition {
                must: build_all(self.must)?,
                should: build_all(self.should)?,
                not: build_all(self.not)?,
            }),
            boost,
        ))
    }
}

// Builders of the shape `{field, value: String, boost}`.
macro_rules! pattern_builder {
    ($builder:ident, $variant:ident, $tag:literal) => {
        #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
        pub struct $builder {
            pub field: String,
            pub value: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub boost: Option<f32>,
        }

        impl $builder {
            #[must_use]
            pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
                Self {
                    field: field.into(),
                    value: value.into(),
                    boost: None,
                }
            }

            boost_setter!();

            pub fn build(self) -> Result<Condition, IndexError> {
                let boost = check_boost($tag, self.boost)?;

                Ok(Condition::new(
                    ConditionKind::$variant {
                        field: require_text($tag, "field", self.field)?,
                        value: require_text($tag, "value", self.value)?,
                    },
                    boost,
                ))
            }
        }
    };
}

pattern_builder!(WildcardConditionBuilder, Wildcard, "wildcard");
pattern_builder!(PrefixConditionBuilder, Prefix, "prefix");
pattern_builder!(RegexpConditionBuilder, Regexp, "regexp");

// Builders of the shape `{field, value: <literal>, boost}`. Literals are held
// in their JSON form so encoding and decoding are inverses.
macro_rules! literal_builder {
    ($builder:ident, $variant:ident, $tag:literal) => {
        #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
        pub struct $builder {
            pub field: String,
            pub value: Value,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub boost: Option<f32>,
        }

        impl $builder {
            #[must_use]
            pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
                Self {
                    field: field.into(),
                    value: literal(value),
                    boost: None,
                }
            }

            boost_setter!();

            pub fn build(self) -> Result<Condition, IndexError> {
                let boost = check_boost($tag, self.boost)?;

                Ok(Condition::new(
                    ConditionKind::$variant {
                        field: require_text($tag, "field", self.field)?,
                        value: require_value($tag, "value", self.value)?,
                    },
                    boost,
                ))
            }
        }
    };
}

literal_builder!(TermConditionBuilder, Term, "term");
literal_builder!(MatchConditionBuilder, Match, "match");

///
/// FuzzyConditionBuilder
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FuzzyConditionBuilder {
    pub field: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_edits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transpositions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl FuzzyConditionBuilder {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            max_edits: None,
            prefix_length: None,
            max_expansions: None,
            transpositions: None,
            boost: None,
        }
    }

    boost_setter!();

    #[must_use]
    pub const fn max_edits(mut self, max_edits: u8) -> Self {
        self.max_edits = Some(max_edits);
        self
    }

    #[must_use]
    pub const fn prefix_length(mut self, prefix_length: u32) -> Self {
        self.prefix_length = Some(prefix_length);
        self
    }

    #[must_use]
    pub const fn max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    #[must_use]
    pub const fn transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = Some(transpositions);
        self
    }

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("fuzzy", self.boost)?;

        let max_edits = self.max_edits.unwrap_or(DEFAULT_MAX_EDITS);
        if max_edits > MAX_EDITS_LIMIT {
            return Err(IndexError::condition(format!(
                "fuzzy condition max_edits must be in 0..={MAX_EDITS_LIMIT}, found {max_edits}"
            )));
        }

        let max_expansions = self.max_expansions.unwrap_or(DEFAULT_MAX_EXPANSIONS);
        if max_expansions == 0 {
            return Err(IndexError::condition(
                "fuzzy condition max_expansions must be positive",
            ));
        }

        Ok(Condition::new(
            ConditionKind::Fuzzy(FuzzyCondition {
                field: require_text("fuzzy", "field", self.field)?,
                value: require_text("fuzzy", "value", self.value)?,
                max_edits,
                prefix_length: self.prefix_length.unwrap_or(DEFAULT_PREFIX_LENGTH),
                max_expansions,
                transpositions: self.transpositions.unwrap_or(DEFAULT_TRANSPOSITIONS),
            }),
            boost,
        ))
    }
}

///
/// PhraseConditionBuilder
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PhraseConditionBuilder {
    pub field: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slop: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl PhraseConditionBuilder {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            slop: None,
            boost: None,
        }
    }

    boost_setter!();

    #[must_use]
    pub const fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("phrase", self.boost)?;

        Ok(Condition::new(
            ConditionKind::Phrase {
                field: require_text("phrase", "field", self.field)?,
                value: require_text("phrase", "value", self.value)?,
                slop: self.slop.unwrap_or(DEFAULT_SLOP),
            },
            boost,
        ))
    }
}

///
/// ContainsConditionBuilder
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContainsConditionBuilder {
    pub field: String,
    pub values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl ContainsConditionBuilder {
    #[must_use]
    pub fn new<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            field: field.into(),
            values: values.into_iter().map(literal).collect(),
            boost: None,
        }
    }

    boost_setter!();

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("contains", self.boost)?;
        if self.values.is_empty() {
            return Err(IndexError::condition(
                "contains condition requires at least one value",
            ));
        }

        let values = self
            .values
            .into_iter()
            .map(|v| require_value("contains", "values", v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Condition::new(
            ConditionKind::Contains {
                field: require_text("contains", "field", self.field)?,
                values,
            },
            boost,
        ))
    }
}

///
/// RangeConditionBuilder
///
/// Both bounds are optional; a range with neither matches any value.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RangeConditionBuilder {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_lower: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_upper: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl RangeConditionBuilder {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: None,
            include_lower: None,
            include_upper: None,
            boost: None,
        }
    }

    boost_setter!();

    #[must_use]
    pub fn lower(mut self, lower: impl Into<Value>) -> Self {
        self.lower = Some(literal(lower));
        self
    }

    #[must_use]
    pub fn upper(mut self, upper: impl Into<Value>) -> Self {
        self.upper = Some(literal(upper));
        self
    }

    #[must_use]
    pub const fn include_lower(mut self, include: bool) -> Self {
        self.include_lower = Some(include);
        self
    }

    #[must_use]
    pub const fn include_upper(mut self, include: bool) -> Self {
        self.include_upper = Some(include);
        self
    }

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("range", self.boost)?;

        Ok(Condition::new(
            ConditionKind::Range(RangeCondition {
                field: require_text("range", "field", self.field)?,
                lower: self.lower.filter(|v| !v.is_null()),
                upper: self.upper.filter(|v| !v.is_null()),
                include_lower: self.include_lower.unwrap_or(DEFAULT_INCLUDE_LOWER),
                include_upper: self.include_upper.unwrap_or(DEFAULT_INCLUDE_UPPER),
            }),
            boost,
        ))
    }
}

///
/// GeoBboxConditionBuilder
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeoBboxConditionBuilder {
    pub field: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl GeoBboxConditionBuilder {
    boost_setter!();

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("geo_bbox", self.boost)?;
        check_coordinates("geo_bbox", self.min_latitude, self.min_longitude)?;
        check_coordinates("geo_bbox", self.max_latitude, self.max_longitude)?;

        if self.min_latitude > self.max_latitude {
            return Err(IndexError::condition(
                "geo_bbox condition min_latitude must not exceed max_latitude",
            ));
        }
        if self.min_longitude > self.max_longitude {
            return Err(IndexError::condition(
                "geo_bbox condition min_longitude must not exceed max_longitude",
            ));
        }

        Ok(Condition::new(
            ConditionKind::GeoBbox(GeoBboxCondition {
                field: require_text("geo_bbox", "field", self.field)?,
                min_latitude: self.min_latitude,
                max_latitude: self.max_latitude,
                min_longitude: self.min_longitude,
                max_longitude: self.max_longitude,
            }),
            boost,
        ))
    }
}

///
/// GeoDistanceConditionBuilder
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeoDistanceConditionBuilder {
    pub field: String,
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

impl GeoDistanceConditionBuilder {
    boost_setter!();

    #[must_use]
    pub fn min_distance(mut self, min_distance: impl Into<String>) -> Self {
        self.min_distance = Some(min_distance.into());
        self
    }

    pub fn build(self) -> Result<Condition, IndexError> {
        let boost = check_boost("geo_distance", self.boost)?;
        check_coordinates("geo_distance", self.latitude, self.longitude)?;

        let max_distance: GeoDistance = self.max_distance.parse()?;
        let min_distance = self
            .min_distance
            .as_deref()
            .map(str::parse::<GeoDistance>)
            .transpose()?;

        if let Some(min) = min_distance.filter(|min| min.to_meters() >= max_distance.to_meters()) {
            return Err(IndexError::condition(format!(
                "geo_distance condition min_distance {min} must be less than max_distance {max_distance}"
            )));
        }

        Ok(Condition::new(
            ConditionKind::GeoDistance(GeoDistanceCondition {
                field: require_text("geo_distance", "field", self.field)?,
                latitude: self.latitude,
                longitude: self.longitude,
                min_distance,
                max_distance,
            }),
            boost,
        ))
    }
}
