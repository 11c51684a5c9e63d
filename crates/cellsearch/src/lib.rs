//! ## Crate layout
//! - `core`: values, mappers, schemas, conditions and the query compiler.
//! - `config`: index options parsed from the storage engine or TOML.
//! - `engine`: the field, query and sort types handed to the search engine.
//! - `obs`: metrics sink and per-thread counters.
//!
//! The `prelude` module carries the vocabulary needed to declare a schema,
//! build searches and feed rows.

pub use cellsearch_core as core;
pub use cellsearch_core::{
    DEFAULT_BOOST, ErrorClass, ErrorOrigin, IndexError, config, engine, error, mapping, obs,
    schema, search, value,
};

/// re-exports
///
/// hosts decoding schemas and searches out of larger JSON documents can use
/// the same serde stack without adding it to their own Cargo.toml
pub mod __reexports {
    pub use serde;
    pub use serde_json;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use cellsearch_core::prelude::*;

    pub use crate::{config::IndexOptions, error::IndexError};
}
