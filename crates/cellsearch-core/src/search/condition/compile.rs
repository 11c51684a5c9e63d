use crate::{
    engine::{Analyzer, BooleanQuery, FieldValue, FuzzyQuery, Occur, Query, RangeQuery},
    error::IndexError,
    mapping::{BaseFamily, Mapper, MapperKind},
    obs::sink::{self, MetricsEvent},
    schema::Schema,
    search::condition::ast::{
        BooleanCondition, Condition, ConditionKind, FuzzyCondition, GeoBboxCondition,
        GeoDistanceCondition, RangeCondition,
    },
    value::Value,
};

///
/// Query compilation
///
/// A single top-down walk of the condition tree against an immutable
/// schema snapshot. Leaves resolve their field through the schema,
/// coerce literals through the field's mapper, and pre-analyze text.
/// Boolean clause order follows condition order exactly.
///

impl Condition {
    /// Compile this condition into an engine query.
    pub fn compile(&self, schema: &Schema) -> Result<Query, IndexError> {
        match compile_node(self, schema) {
            Ok(query) => {
                let nodes = self.node_count() as u64;
                tracing::debug!(nodes, "query compiled");
                sink::record(MetricsEvent::QueryCompiled { nodes });
                Ok(query)
            }
            Err(err) => {
                tracing::debug!(error = %err, "query compilation rejected");
                sink::record(MetricsEvent::CompileRejected);
                Err(err)
            }
        }
    }
}

fn compile_node(condition: &Condition, schema: &Schema) -> Result<Query, IndexError> {
    let query = match &condition.kind {
        ConditionKind::All => Query::MatchAll,
        ConditionKind::None => Query::MatchNone,
        ConditionKind::Boolean(b) => compile_boolean(b, schema)?,
        ConditionKind::Wildcard { field, value } => {
            let mapper = string_mapper(schema, field, "wildcard")?;
            Query::Wildcard {
                field: field.clone(),
                pattern: keyword_text(mapper, value),
            }
        }
        ConditionKind::Prefix { field, value } => {
            let mapper = string_mapper(schema, field, "prefix")?;
            Query::Prefix {
                field: field.clone(),
                prefix: keyword_text(mapper, value),
            }
        }
        ConditionKind::Regexp { field, value } => {
            let mapper = string_mapper(schema, field, "regexp")?;
            Query::Regexp {
                field: field.clone(),
                pattern: keyword_text(mapper, value),
            }
        }
        ConditionKind::Fuzzy(c) => compile_fuzzy(c, schema)?,
        ConditionKind::Term { field, value } => {
            let mapper = schema.require_mapper(field)?;
            reject_spatial(mapper, "term")?;
            Query::term(field, required_base(mapper, value)?)
        }
        ConditionKind::Match { field, value } => compile_match(schema, field, value)?,
        ConditionKind::Phrase { field, value, slop } => {
            let mapper = string_mapper(schema, field, "phrase")?;
            let terms = match schema.analyzer(field) {
                Some(analyzer) => analyzer.analyze(value),
                None => vec![keyword_text(mapper, value)],
            };

            if terms.is_empty() {
                Query::MatchNone
            } else {
                Query::Phrase {
                    field: field.clone(),
                    terms,
                    slop: *slop,
                }
            }
        }
        ConditionKind::Contains { field, values } => {
            let mut boolean = BooleanQuery::new();
            for value in values {
                boolean.add(Occur::Should, compile_match(schema, field, value)?);
            }
            Query::Boolean(boolean)
        }
        ConditionKind::Range(c) => compile_range(c, schema)?,
        ConditionKind::GeoBbox(c) => compile_geo_bbox(c, schema)?,
        ConditionKind::GeoDistance(c) => compile_geo_distance(c, schema)?,
    };

    Ok(query.boosted(condition.boost))
}

// With no required or optional clause, an implicit match-all leads so that
// prohibited clauses subtract from everything.
fn compile_boolean(condition: &BooleanCondition, schema: &Schema) -> Result<Query, IndexError> {
    let mut boolean = BooleanQuery::new();

    if condition.must.is_empty() && condition.should.is_empty() {
        boolean.add(Occur::Must, Query::MatchAll);
    }

    let lists = [
        (Occur::Must, &condition.must),
        (Occur::Should, &condition.should),
        (Occur::MustNot, &condition.not),
    ];
    for (occur, children) in lists {
        for child in children {
            boolean.add(occur, compile_node(child, schema)?);
        }
    }

    Ok(Query::Boolean(boolean))
}

fn compile_fuzzy(condition: &FuzzyCondition, schema: &Schema) -> Result<Query, IndexError> {
    let mapper = string_mapper(schema, &condition.field, "fuzzy")?;

    Ok(Query::Fuzzy(FuzzyQuery {
        field: condition.field.clone(),
        term: keyword_text(mapper, &condition.value),
        max_edits: condition.max_edits,
        prefix_length: condition.prefix_length,
        max_expansions: condition.max_expansions,
        transpositions: condition.transpositions,
    }))
}

// Text fields: analyze the coerced value, one term per token.
// Other fields: a single term on the coerced base.
fn compile_match(schema: &Schema, field: &str, value: &Value) -> Result<Query, IndexError> {
    let mapper = schema.require_mapper(field)?;
    reject_spatial(mapper, "match")?;
    let base = required_base(mapper, value)?;

    let Some(analyzer) = schema.analyzer(field) else {
        return Ok(Query::term(field, base));
    };

    let text = base.as_str().unwrap_or_default();
    Ok(analyzed_terms(analyzer, field, text))
}

fn analyzed_terms(analyzer: Analyzer, field: &str, text: &str) -> Query {
    let mut tokens = analyzer.analyze(text);

    match tokens.len() {
        0 => Query::MatchNone,
        1 => Query::term(field, FieldValue::Str(tokens.remove(0))),
        _ => {
            let mut boolean = BooleanQuery::new();
            for token in tokens {
                boolean.add(Occur::Should, Query::term(field, FieldValue::Str(token)));
            }
            Query::Boolean(boolean)
        }
    }
}

fn compile_range(condition: &RangeCondition, schema: &Schema) -> Result<Query, IndexError> {
    let field = &condition.field;
    let mapper = schema.require_mapper(field)?;
    reject_spatial(mapper, "range")?;

    let bound = |value: &Option<Value>| -> Result<Option<FieldValue>, IndexError> {
        match value {
            Some(v) => mapper.base(field, v).map_err(|err| compile_error(field, &err)),
            None => Ok(None),
        }
    };

    Ok(Query::Range(RangeQuery {
        field: field.clone(),
        lower: bound(&condition.lower)?,
        upper: bound(&condition.upper)?,
        include_lower: condition.include_lower,
        include_upper: condition.include_upper,
    }))
}

fn compile_geo_bbox(condition: &GeoBboxCondition, schema: &Schema) -> Result<Query, IndexError> {
    geo_mapper(schema, &condition.field, "geo_bbox")?;

    Ok(Query::GeoBoundingBox {
        field: condition.field.clone(),
        min_latitude: condition.min_latitude,
        max_latitude: condition.max_latitude,
        min_longitude: condition.min_longitude,
        max_longitude: condition.max_longitude,
    })
}

fn compile_geo_distance(
    condition: &GeoDistanceCondition,
    schema: &Schema,
) -> Result<Query, IndexError> {
    geo_mapper(schema, &condition.field, "geo_distance")?;

    Ok(Query::GeoDistance {
        field: condition.field.clone(),
        latitude: condition.latitude,
        longitude: condition.longitude,
        min_distance: condition.min_distance.map(|d| d.to_meters()),
        max_distance: condition.max_distance.to_meters(),
    })
}

///
/// FIELD RESOLUTION
///

fn string_mapper<'a>(
    schema: &'a Schema,
    field: &str,
    tag: &str,
) -> Result<&'a Mapper, IndexError> {
    let mapper = schema.require_mapper(field)?;
    if mapper.metadata().is_string() {
        Ok(mapper)
    } else {
        Err(unsupported(mapper, tag))
    }
}

fn geo_mapper<'a>(
    schema: &'a Schema,
    field: &str,
    tag: &str,
) -> Result<&'a Mapper, IndexError> {
    let mapper = schema.require_mapper(field)?;
    if mapper.metadata().family == BaseFamily::Spatial {
        Ok(mapper)
    } else {
        Err(unsupported(mapper, tag))
    }
}

fn reject_spatial(mapper: &Mapper, tag: &str) -> Result<(), IndexError> {
    if mapper.metadata().family == BaseFamily::Spatial {
        Err(unsupported(mapper, tag))
    } else {
        Ok(())
    }
}

fn unsupported(mapper: &Mapper, tag: &str) -> IndexError {
    IndexError::compilation(format!(
        "{tag} conditions are not supported by '{}' field '{}'",
        mapper.kind().tag(),
        mapper.field()
    ))
}

///
/// LITERALS
///

// Case folding of case-insensitive string fields applies to patterns too.
fn keyword_text(mapper: &Mapper, text: &str) -> String {
    match mapper.kind() {
        MapperKind::String {
            case_sensitive: false,
        } => text.to_lowercase(),
        _ => text.to_string(),
    }
}

fn required_base(mapper: &Mapper, value: &Value) -> Result<FieldValue, IndexError> {
    mapper
        .base(mapper.field(), value)
        .map_err(|err| compile_error(mapper.field(), &err))?
        .ok_or_else(|| {
            IndexError::compilation(format!(
                "condition value for field '{}' must not be null",
                mapper.field()
            ))
        })
}

fn compile_error(field: &str, err: &IndexError) -> IndexError {
    IndexError::compilation(format!("invalid value for field '{field}': {err}"))
}
