//! Mapper registry.
//!
//! A `Schema` is an immutable snapshot built once per schema version and
//! passed by reference to every writer and compiler. There is no global
//! registry.

mod builder;


use crate::{
    engine::{Analyzer, Document, SortField},
    error::IndexError,
    mapping::{ColumnMetadata, Mapper, sort_name},
    value::Columns,
};
use std::collections::BTreeMap;

// re-exports
pub use builder::SchemaBuilder;

///
/// Schema
///

#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    default_analyzer: String,
    mappers: Vec<Mapper>,
    by_field: BTreeMap<String, usize>,
}

impl Schema {
    pub(crate) fn new(default_analyzer: String, mappers: Vec<Mapper>) -> Self {
        let by_field = mappers
            .iter()
            .enumerate()
            .map(|(i, m)| (m.field().to_string(), i))
            .collect();

        Self {
            default_analyzer,
            mappers,
            by_field,
        }
    }

    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Decode and build a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        SchemaBuilder::from_json(json)?.build()
    }

    #[must_use]
    pub fn default_analyzer(&self) -> &str {
        &self.default_analyzer
    }

    #[must_use]
    pub fn mapper(&self, field: &str) -> Option<&Mapper> {
        self.by_field.get(field).map(|&i| &self.mappers[i])
    }

    /// Resolve a field or fail with the canonical compilation error.
    pub fn require_mapper(&self, field: &str) -> Result<&Mapper, IndexError> {
        self.mapper(field)
            .ok_or_else(|| IndexError::field_not_found(field))
    }

    /// Mappers in declaration order.
    pub fn mappers(&self) -> impl Iterator<Item = &Mapper> {
        self.mappers.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.mappers.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Every source column read by some mapper, first-use order, deduplicated.
    #[must_use]
    pub fn mapped_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for column in self.mappers.iter().flat_map(Mapper::mapped_columns) {
            if !columns.contains(&column.as_str()) {
                columns.push(column.as_str());
            }
        }

        columns
    }

    /// Resolved analyzer of a text field; `None` for other fields.
    #[must_use]
    pub fn analyzer(&self, field: &str) -> Option<Analyzer> {
        self.mapper(field)
            .and_then(Mapper::analyzer)
            .and_then(Analyzer::from_name)
    }

    /// Check that every mapped column exists and has a compatible type.
    pub fn validate_columns(&self, columns: &[ColumnMetadata]) -> Result<(), IndexError> {
        for mapper in &self.mappers {
            for name in mapper.mapped_columns() {
                let column = columns.iter().find(|c| c.name == *name).ok_or_else(|| {
                    IndexError::schema(format!(
                        "no column '{name}' for mapper '{}'",
                        mapper.field()
                    ))
                })?;

                if !mapper.supports(&column.ty) {
                    return Err(IndexError::schema(format!(
                        "'{}' mapper '{}' does not support column '{name}' of type {}",
                        mapper.kind().tag(),
                        mapper.field(),
                        column.ty
                    )));
                }
            }
        }

        Ok(())
    }

    /// Materialize the engine document for one written row.
    pub fn document(&self, columns: &Columns) -> Result<Document, IndexError> {
        let mut document = Document::new();
        for mapper in &self.mappers {
            document.extend(mapper.fields(columns)?);
        }

        Ok(document)
    }

    /// Sort descriptor over the `<field>.sort` doc values.
    pub fn sort_field(&self, field: &str, reverse: bool) -> Result<SortField, IndexError> {
        self.require_mapper(field)?
            .sort_field(&sort_name(field), reverse)
    }
}
