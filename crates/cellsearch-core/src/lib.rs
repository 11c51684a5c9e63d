//! Core runtime for cellsearch: raw cell values, column mappers, index
//! schemas, search conditions and the query compiler, plus the engine
//! boundary types they produce.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod obs;
pub mod schema;
pub mod search;
pub mod value;

///
/// CONSTANTS
///

/// Boost applied to mappers and conditions that do not set one.
pub const DEFAULT_BOOST: f32 = 1.0;

// re-exports
pub use error::{ErrorClass, ErrorOrigin, IndexError};

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No engine types, metrics or codecs are re-exported here.
///

pub mod prelude {
    pub use crate::{
        mapping::MapperBuilder,
        schema::{Schema, SchemaBuilder},
        search::{
            Search, SearchBuilder, SortFieldBuilder,
            condition::{Condition, ConditionBuilder},
        },
        value::{Columns, Value},
    };
}
