//! Index options.
//!
//! Options arrive either as the storage engine's flat string map (the index
//! `WITH OPTIONS` clause) or as a TOML document. Both paths read into the
//! same raw form, then validate into `IndexOptions`.

use crate::{error::IndexError, schema::Schema};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_REFRESH_SECONDS: u64 = 60;
pub const DEFAULT_RAM_BUFFER_MB: u64 = 64;
pub const DEFAULT_MAX_MERGE_MB: u64 = 5;
pub const DEFAULT_MAX_CACHED_MB: u64 = 30;
pub const DEFAULT_INDEXING_THREADS: usize = 0;
pub const DEFAULT_INDEXING_QUEUES_SIZE: usize = 50;

///
/// IndexOptions
///

#[derive(Clone, Debug, PartialEq)]
pub struct IndexOptions {
    pub schema: Schema,
    pub refresh_seconds: u64,
    pub ram_buffer_mb: u64,
    pub max_merge_mb: u64,
    pub max_cached_mb: u64,
    /// Zero means synchronous indexing.
    pub indexing_threads: usize,
    pub indexing_queues_size: usize,
    pub excluded_data_centers: Vec<String>,
}

impl IndexOptions {
    /// Parse the storage engine's option map. Keys that are not index
    /// options (such as the engine's own `class_name` or `target`) are ignored.
    pub fn from_map(options: &BTreeMap<String, String>) -> Result<Self, IndexError> {
        let get = |key: &str| options.get(key).map(String::as_str);

        let raw = RawIndexOptions {
            schema: get("schema").map(str::to_string),
            refresh_seconds: parse_option(get("refresh_seconds"), "refresh_seconds")?,
            ram_buffer_mb: parse_option(get("ram_buffer_mb"), "ram_buffer_mb")?,
            max_merge_mb: parse_option(get("max_merge_mb"), "max_merge_mb")?,
            max_cached_mb: parse_option(get("max_cached_mb"), "max_cached_mb")?,
            indexing_threads: parse_option(get("indexing_threads"), "indexing_threads")?,
            indexing_queues_size: parse_option(
                get("indexing_queues_size"),
                "indexing_queues_size",
            )?,
            excluded_data_centers: get("excluded_data_centers").map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|dc| !dc.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
        };

        raw.validate()
    }

    /// Parse a TOML options document; unknown keys are rejected.
    pub fn from_toml(text: &str) -> Result<Self, IndexError> {
        let raw: RawIndexOptions = toml::from_str(text)?;

        raw.validate()
    }

    /// True when indexing runs on the caller's thread.
    #[must_use]
    pub const fn is_synchronous(&self) -> bool {
        self.indexing_threads == 0
    }

    #[must_use]
    pub fn is_excluded(&self, data_center: &str) -> bool {
        self.excluded_data_centers.iter().any(|dc| dc == data_center)
    }
}

///
/// RawIndexOptions
///

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndexOptions {
    schema: Option<String>,
    refresh_seconds: Option<u64>,
    ram_buffer_mb: Option<u64>,
    max_merge_mb: Option<u64>,
    max_cached_mb: Option<u64>,
    indexing_threads: Option<usize>,
    indexing_queues_size: Option<usize>,
    excluded_data_centers: Option<Vec<String>>,
}

impl RawIndexOptions {
    fn validate(self) -> Result<IndexOptions, IndexError> {
        let schema_json = self
            .schema
            .ok_or_else(|| IndexError::config("missing required option 'schema'"))?;
        let schema = Schema::from_json(&schema_json)
            .map_err(|err| IndexError::config(format!("invalid option 'schema': {err}")))?;

        let options = IndexOptions {
            schema,
            refresh_seconds: positive(
                "refresh_seconds",
                self.refresh_seconds.unwrap_or(DEFAULT_REFRESH_SECONDS),
            )?,
            ram_buffer_mb: positive(
                "ram_buffer_mb",
                self.ram_buffer_mb.unwrap_or(DEFAULT_RAM_BUFFER_MB),
            )?,
            max_merge_mb: positive(
                "max_merge_mb",
                self.max_merge_mb.unwrap_or(DEFAULT_MAX_MERGE_MB),
            )?,
            max_cached_mb: positive(
                "max_cached_mb",
                self.max_cached_mb.unwrap_or(DEFAULT_MAX_CACHED_MB),
            )?,
            indexing_threads: self.indexing_threads.unwrap_or(DEFAULT_INDEXING_THREADS),
            indexing_queues_size: positive(
                "indexing_queues_size",
                self.indexing_queues_size
                    .unwrap_or(DEFAULT_INDEXING_QUEUES_SIZE),
            )?,
            excluded_data_centers: self.excluded_data_centers.unwrap_or_default(),
        };

        tracing::debug!(
            fields = options.schema.len(),
            refresh_seconds = options.refresh_seconds,
            indexing_threads = options.indexing_threads,
            "index options parsed"
        );

        Ok(options)
    }
}

fn parse_option<T: std::str::FromStr>(
    value: Option<&str>,
    key: &str,
) -> Result<Option<T>, IndexError> {
    value
        .map(|v| {
            v.trim().parse().map_err(|_| {
                IndexError::config(format!(
                    "option '{key}' must be a non-negative integer, found '{v}'"
                ))
            })
        })
        .transpose()
}

fn positive<T>(key: &str, value: T) -> Result<T, IndexError>
where
    T: Copy + Default + PartialOrd + std::fmt::Display,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(IndexError::config(format!(
            "option '{key}' must be strictly positive, found {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    const SCHEMA: &str = r#"{"default_analyzer":"english","fields":{"age":{"type":"integer"}}}"#;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn map_defaults_apply() {
        let options = IndexOptions::from_map(&map(&[("schema", SCHEMA), ("target", "x")])).unwrap();

        assert_eq!(options.refresh_seconds, DEFAULT_REFRESH_SECONDS);
        assert_eq!(options.ram_buffer_mb, DEFAULT_RAM_BUFFER_MB);
        assert_eq!(options.indexing_queues_size, DEFAULT_INDEXING_QUEUES_SIZE);
        assert!(options.is_synchronous());
        assert!(options.excluded_data_centers.is_empty());
        assert_eq!(options.schema.default_analyzer(), "english");
    }

    #[test]
    fn map_values_are_parsed() {
        let options = IndexOptions::from_map(&map(&[
            ("schema", SCHEMA),
            ("refresh_seconds", "1"),
            ("indexing_threads", "4"),
            ("excluded_data_centers", "dc1, dc2,"),
        ]))
        .unwrap();

        assert_eq!(options.refresh_seconds, 1);
        assert_eq!(options.indexing_threads, 4);
        assert_eq!(options.excluded_data_centers, vec!["dc1", "dc2"]);
        assert!(options.is_excluded("dc2"));
        assert!(!options.is_excluded("dc3"));
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        for (key, value) in [
            ("refresh_seconds", "0"),
            ("ram_buffer_mb", "-1"),
            ("indexing_queues_size", "many"),
        ] {
            let err = IndexOptions::from_map(&map(&[("schema", SCHEMA), (key, value)])).unwrap_err();
            assert_eq!(err.class, ErrorClass::Configuration, "{key}");
            assert!(err.message.contains(key), "{err}");
        }
    }

    #[test]
    fn schema_is_required_and_validated() {
        let err = IndexOptions::from_map(&BTreeMap::new()).unwrap_err();
        assert!(err.message.contains("'schema'"));

        let bad = r#"{"fields":{"a":{"type":"nope"}}}"#;
        let err = IndexOptions::from_map(&map(&[("schema", bad)])).unwrap_err();
        assert_eq!(err.class, ErrorClass::Configuration);
    }

    #[test]
    fn toml_document_is_parsed() {
        let text = format!(
            "schema = '{SCHEMA}'\nrefresh_seconds = 5\nexcluded_data_centers = [\"dc1\"]\n"
        );
        let options = IndexOptions::from_toml(&text).unwrap();

        assert_eq!(options.refresh_seconds, 5);
        assert_eq!(options.max_merge_mb, DEFAULT_MAX_MERGE_MB);
        assert_eq!(options.excluded_data_centers, vec!["dc1"]);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let text = format!("schema = '{SCHEMA}'\nrefresh = 5\n");
        let err = IndexOptions::from_toml(&text).unwrap_err();

        assert_eq!(err.class, ErrorClass::Configuration);
    }
}
