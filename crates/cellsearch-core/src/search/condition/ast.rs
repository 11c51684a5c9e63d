use crate::{DEFAULT_BOOST, search::condition::distance::GeoDistance, value::Value};

///
/// Condition AST
///
/// Immutable, schema-agnostic tree of search conditions. Produced only by
/// the validating `build()` of a condition builder; field resolution and
/// value coercion happen later, in the compiler.
///

///
/// Condition
///

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub boost: f32,
    pub kind: ConditionKind,
}

impl Condition {
    #[must_use]
    pub const fn new(kind: ConditionKind, boost: f32) -> Self {
        Self { boost, kind }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self::new(ConditionKind::All, DEFAULT_BOOST)
    }

    /// Referenced field, for leaf conditions.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match &self.kind {
            ConditionKind::All | ConditionKind::None | ConditionKind::Boolean(_) => None,
            ConditionKind::Wildcard { field, .. }
            | ConditionKind::Prefix { field, .. }
            | ConditionKind::Regexp { field, .. }
            | ConditionKind::Term { field, .. }
            | ConditionKind::Match { field, .. }
            | ConditionKind::Phrase { field, .. }
            | ConditionKind::Contains { field, .. } => Some(field),
            ConditionKind::Fuzzy(c) => Some(&c.field),
            ConditionKind::Range(c) => Some(&c.field),
            ConditionKind::GeoBbox(c) => Some(&c.field),
            ConditionKind::GeoDistance(c) => Some(&c.field),
        }
    }

    /// Number of nodes in this tree, including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ConditionKind::Boolean(b) => {
                1 + b
                    .must
                    .iter()
                    .chain(&b.should)
                    .chain(&b.not)
                    .map(Self::node_count)
                    .sum::<usize>()
            }
            _ => 1,
        }
    }
}

///
/// ConditionKind
///

#[derive(Clone, Debug, PartialEq)]
pub enum ConditionKind {
    All,
    None,
    Boolean(BooleanCondition),
    Wildcard { field: String, value: String },
    Prefix { field: String, value: String },
    Regexp { field: String, value: String },
    Fuzzy(FuzzyCondition),
    Term { field: String, value: Value },
    Match { field: String, value: Value },
    Phrase { field: String, value: String, slop: u32 },
    Contains { field: String, values: Vec<Value> },
    Range(RangeCondition),
    GeoBbox(GeoBboxCondition),
    GeoDistance(GeoDistanceCondition),
}

///
/// BooleanCondition
///
/// Children are kept in insertion order per list.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BooleanCondition {
    pub must: Vec<Condition>,
    pub should: Vec<Condition>,
    pub not: Vec<Condition>,
}

///
/// FuzzyCondition
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FuzzyCondition {
    pub field: String,
    pub value: String,
    pub max_edits: u8,
    pub prefix_length: u32,
    pub max_expansions: u32,
    pub transpositions: bool,
}

///
/// RangeCondition
///

#[derive(Clone, Debug, PartialEq)]
pub struct RangeCondition {
    pub field: String,
    pub lower: Option<Value>,
    pub upper: Option<Value>,
    pub include_lower: bool,
    pub include_upper: bool,
}

///
/// GeoBboxCondition
///

#[derive(Clone, Debug, PartialEq)]
pub struct GeoBboxCondition {
    pub field: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

///
/// GeoDistanceCondition
///

#[derive(Clone, Debug, PartialEq)]
pub struct GeoDistanceCondition {
    pub field: String,
    pub latitude: f64,
    pub longitude: f64,
    pub min_distance: Option<GeoDistance>,
    pub max_distance: GeoDistance,
}
