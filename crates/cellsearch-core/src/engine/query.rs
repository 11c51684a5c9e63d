use crate::{DEFAULT_BOOST, engine::field::FieldValue};
use std::fmt;

///
/// Occur
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
    /// Required but non-scoring.
    Filter,
}

impl Occur {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Must => "+",
            Self::Should => "",
            Self::MustNot => "-",
            Self::Filter => "#",
        }
    }
}

///
/// BooleanQuery
///
/// Clauses are kept in insertion order; the engine's scoring ties depend on
/// it, so compiled clause order must match condition order exactly.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BooleanQuery {
    pub clauses: Vec<(Occur, Query)>,
}

impl BooleanQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    pub fn add(&mut self, occur: Occur, query: Query) {
        self.clauses.push((occur, query));
    }

    #[must_use]
    pub fn with(mut self, occur: Occur, query: Query) -> Self {
        self.add(occur, query);
        self
    }

    /// Number of clauses with the given occurrence.
    #[must_use]
    pub fn count(&self, occur: Occur) -> usize {
        self.clauses.iter().filter(|(o, _)| *o == occur).count()
    }

    pub fn clauses_of(&self, occur: Occur) -> impl Iterator<Item = &Query> {
        self.clauses
            .iter()
            .filter(move |(o, _)| *o == occur)
            .map(|(_, q)| q)
    }
}

///
/// RangeQuery
///

#[derive(Clone, Debug, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub lower: Option<FieldValue>,
    pub upper: Option<FieldValue>,
    pub include_lower: bool,
    pub include_upper: bool,
}

///
/// FuzzyQuery
///

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuzzyQuery {
    pub field: String,
    pub term: String,
    pub max_edits: u8,
    pub prefix_length: u32,
    pub max_expansions: u32,
    pub transpositions: bool,
}

///
/// Query
///
/// Executable query tree handed to the search engine.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    MatchAll,
    MatchNone,
    Term {
        field: String,
        value: FieldValue,
    },
    Range(RangeQuery),
    Wildcard {
        field: String,
        pattern: String,
    },
    Prefix {
        field: String,
        prefix: String,
    },
    Regexp {
        field: String,
        pattern: String,
    },
    Fuzzy(FuzzyQuery),
    Phrase {
        field: String,
        terms: Vec<String>,
        slop: u32,
    },
    Boolean(BooleanQuery),
    Boost {
        query: Box<Self>,
        boost: f32,
    },
    ConstantScore(Box<Self>),
    GeoBoundingBox {
        field: String,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    },
    /// Distances in meters.
    GeoDistance {
        field: String,
        latitude: f64,
        longitude: f64,
        min_distance: Option<f64>,
        max_distance: f64,
    },
}

impl Query {
    #[must_use]
    pub fn term(field: impl Into<String>, value: FieldValue) -> Self {
        Self::Term {
            field: field.into(),
            value,
        }
    }

    /// Multiply a boost into this query. The default boost leaves it as is.
    #[must_use]
    pub fn boosted(self, boost: f32) -> Self {
        if boost.to_bits() == DEFAULT_BOOST.to_bits() {
            self
        } else {
            Self::Boost {
                query: Box::new(self),
                boost,
            }
        }
    }

    #[must_use]
    pub const fn as_boolean(&self) -> Option<&BooleanQuery> {
        if let Self::Boolean(b) = self {
            Some(b)
        } else {
            None
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchAll => write!(f, "*:*"),
            Self::MatchNone => write!(f, "MatchNone"),
            Self::Term { field, value } => write!(f, "{field}:{value}"),
            Self::Range(r) => {
                let open = if r.include_lower { '[' } else { '{' };
                let close = if r.include_upper { ']' } else { '}' };
                let lower = r.lower.as_ref().map_or_else(|| "*".to_string(), ToString::to_string);
                let upper = r.upper.as_ref().map_or_else(|| "*".to_string(), ToString::to_string);
                write!(f, "{}:{open}{lower} TO {upper}{close}", r.field)
            }
            Self::Wildcard { field, pattern } => write!(f, "{field}:{pattern}"),
            Self::Prefix { field, prefix } => write!(f, "{field}:{prefix}*"),
            Self::Regexp { field, pattern } => write!(f, "{field}:/{pattern}/"),
            Self::Fuzzy(q) => write!(f, "{}:{}~{}", q.field, q.term, q.max_edits),
            Self::Phrase { field, terms, slop } => {
                write!(f, "{field}:\"{}\"", terms.join(" "))?;
                if *slop > 0 {
                    write!(f, "~{slop}")?;
                }
                Ok(())
            }
            Self::Boolean(b) => {
                write!(f, "(")?;
                for (i, (occur, query)) in b.clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}{query}", occur.prefix())?;
                }
                write!(f, ")")
            }
            Self::Boost { query, boost } => write!(f, "({query})^{boost}"),
            Self::ConstantScore(query) => write!(f, "ConstantScore({query})"),
            Self::GeoBoundingBox {
                field,
                min_latitude,
                max_latitude,
                min_longitude,
                max_longitude,
            } => write!(
                f,
                "{field}:bbox({min_latitude},{min_longitude} {max_latitude},{max_longitude})"
            ),
            Self::GeoDistance {
                field,
                latitude,
                longitude,
                min_distance,
                max_distance,
            } => write!(
                f,
                "{field}:distance({latitude},{longitude} {}..{max_distance}m)",
                min_distance.unwrap_or(0.0)
            ),
        }
    }
}
