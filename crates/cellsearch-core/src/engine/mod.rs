//! Search-engine boundary.
//!
//! Plain data the core hands to the (opaque) search engine: document fields
//! on the write path, query trees and sort descriptors on the read path.
//! Nothing here executes anything.

pub mod analysis;
pub mod field;
pub mod query;
pub mod sort;

#[cfg(test)]
mod tests;

// re-exports
pub use analysis::{Analyzer, DEFAULT_ANALYZER};
pub use field::{DocValuesType, Document, Field, FieldKind, FieldValue};
pub use query::{BooleanQuery, FuzzyQuery, Occur, Query, RangeQuery};
pub use sort::{SortField, SortKind};
