//! Search conditions.
//!
//! Builders (JSON-facing, mutable) validate into an immutable `Condition`
//! tree, which compiles against a `Schema` into an engine `Query`.

pub mod ast;
pub mod builder;
pub mod compile;
pub mod distance;
pub mod json;


// re-exports
pub use ast::{
    BooleanCondition, Condition, ConditionKind, FuzzyCondition, GeoBboxCondition,
    GeoDistanceCondition, RangeCondition,
};
pub use builder::{
    AllConditionBuilder, BooleanConditionBuilder, ConditionBuilder, ContainsConditionBuilder,
    FuzzyConditionBuilder, GeoBboxConditionBuilder, GeoDistanceConditionBuilder,
    MatchConditionBuilder, NoneConditionBuilder, PhraseConditionBuilder, PrefixConditionBuilder,
    RangeConditionBuilder, RegexpConditionBuilder, TermConditionBuilder, WildcardConditionBuilder,
};
pub use distance::{DistanceUnit, GeoDistance};
