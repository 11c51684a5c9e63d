use crate::{
    engine::{Analyzer, DEFAULT_ANALYZER},
    error::IndexError,
    mapping::{Mapper, MapperBuilder},
    obs::sink::{self, DecodeKind, MetricsEvent},
    schema::Schema,
};
use serde::{Deserialize, Serialize};

///
/// SchemaBuilder
///
/// Mutable, JSON-serializable staging form of a `Schema`.
/// Fields keep their declaration order through the JSON round trip.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SchemaBuilder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_analyzer: Option<String>,
    #[serde(default, with = "ordered_fields")]
    pub fields: Vec<(String, MapperBuilder)>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.default_analyzer = Some(analyzer.into());
        self
    }

    /// Append a field mapping. Duplicate names are rejected by `build`.
    #[must_use]
    pub fn mapper(mut self, field: impl Into<String>, mapper: impl Into<MapperBuilder>) -> Self {
        self.fields.push((field.into(), mapper.into()));
        self
    }

    /// Validate every mapper and analyzer reference and freeze the schema.
    pub fn build(&self) -> Result<Schema, IndexError> {
        let default_analyzer = self
            .default_analyzer
            .clone()
            .unwrap_or_else(|| DEFAULT_ANALYZER.to_string());
        if Analyzer::from_name(&default_analyzer).is_none() {
            return Err(IndexError::schema(format!(
                "unknown default analyzer '{default_analyzer}'"
            )));
        }

        let mut mappers: Vec<Mapper> = Vec::with_capacity(self.fields.len());
        for (field, builder) in &self.fields {
            if mappers.iter().any(|m| m.field() == field) {
                return Err(IndexError::schema(format!("duplicate field '{field}'")));
            }

            let mut mapper = builder.build(field)?;
            mapper.resolve_analyzer(&default_analyzer);
            mappers.push(mapper);
        }

        tracing::debug!(fields = mappers.len(), %default_analyzer, "schema built");
        sink::record(MetricsEvent::SchemaBuilt {
            fields: mappers.len() as u64,
        });

        Ok(Schema::new(default_analyzer, mappers))
    }

    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string(self).map_err(IndexError::from)
    }

    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let builder = serde_json::from_str(json)?;
        sink::record(MetricsEvent::JsonDecoded {
            kind: DecodeKind::Schema,
        });

        Ok(builder)
    }
}

// Field map as an ordered JSON object; duplicate keys are a decode error.
mod ordered_fields {
    use crate::mapping::MapperBuilder;
    use serde::{
        Deserializer, Serializer,
        de::{Error, MapAccess, Visitor},
    };
    use std::fmt;

    pub fn serialize<S>(fields: &[(String, MapperBuilder)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(fields.iter().map(|(k, v)| (k, v)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, MapperBuilder)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Vec<(String, MapperBuilder)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to mappers")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields: Vec<(String, MapperBuilder)> = Vec::new();
                while let Some((name, mapper)) = map.next_entry::<String, MapperBuilder>()? {
                    if fields.iter().any(|(n, _)| *n == name) {
                        return Err(A::Error::custom(format!("duplicate field '{name}'")));
                    }
                    fields.push((name, mapper));
                }

                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
