//! Search requests.
//!
//! A search pairs an optional scoring `query` with an optional non-scoring
//! `filter`, plus sort fields and a refresh hint. It compiles against a
//! schema into one engine query and the engine sort descriptors.

pub mod condition;

#[cfg(test)]
mod tests;

use crate::{
    engine::{BooleanQuery, Occur, Query, SortField},
    error::IndexError,
    obs::sink::{self, DecodeKind, MetricsEvent},
    schema::Schema,
    search::condition::{Condition, ConditionBuilder},
};
use serde::{Deserialize, Serialize};

///
/// SortFieldBuilder
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortFieldBuilder {
    pub field: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
}

impl SortFieldBuilder {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reverse: false,
        }
    }

    #[must_use]
    pub const fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

///
/// SearchBuilder
///
/// JSON form: `{"query":{..},"filter":{..},"sort":[{"field":"age"}],"refresh":true}`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<ConditionBuilder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ConditionBuilder>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortFieldBuilder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<bool>,
}

impl SearchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<ConditionBuilder>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<ConditionBuilder>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortFieldBuilder) -> Self {
        self.sort.push(sort);
        self
    }

    #[must_use]
    pub const fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn build(self) -> Result<Search, IndexError> {
        let sort = self
            .sort
            .into_iter()
            .map(|s| {
                if s.field.trim().is_empty() {
                    Err(IndexError::condition("sort field name must not be empty"))
                } else {
                    Ok(s)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Search {
            query: self.query.map(ConditionBuilder::build).transpose()?,
            filter: self.filter.map(ConditionBuilder::build).transpose()?,
            sort,
            refresh: self.refresh.unwrap_or(false),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let builder: Self = serde_json::from_str(json)?;
        sink::record(MetricsEvent::JsonDecoded {
            kind: DecodeKind::Search,
        });

        Ok(builder)
    }

    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string(self).map_err(IndexError::from)
    }
}

///
/// Search
///

#[derive(Clone, Debug, PartialEq)]
pub struct Search {
    pub query: Option<Condition>,
    pub filter: Option<Condition>,
    pub sort: Vec<SortFieldBuilder>,
    pub refresh: bool,
}

impl Search {
    #[must_use]
    pub fn builder() -> SearchBuilder {
        SearchBuilder::new()
    }

    /// Decode and validate a search in one step.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        SearchBuilder::from_json(json)?.build()
    }

    /// True when the search asks for a refresh before running.
    #[must_use]
    pub const fn requires_refresh(&self) -> bool {
        self.refresh
    }

    /// True when a relevance-scoring query is present.
    #[must_use]
    pub const fn uses_relevance(&self) -> bool {
        self.query.is_some()
    }

    pub fn compile(&self, schema: &Schema) -> Result<CompiledSearch, IndexError> {
        let query = match (&self.query, &self.filter) {
            (Some(query), Some(filter)) => Query::Boolean(
                BooleanQuery::new()
                    .with(Occur::Must, query.compile(schema)?)
                    .with(Occur::Filter, filter.compile(schema)?),
            ),
            (Some(query), None) => query.compile(schema)?,
            (None, Some(filter)) => Query::ConstantScore(Box::new(filter.compile(schema)?)),
            (None, None) => Query::MatchAll,
        };

        let sort = self
            .sort
            .iter()
            .map(|s| schema.sort_field(&s.field, s.reverse))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledSearch { query, sort })
    }
}

///
/// CompiledSearch
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSearch {
    pub query: Query,
    pub sort: Vec<SortField>,
}
