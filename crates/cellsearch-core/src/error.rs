use std::fmt;
use thiserror::Error as ThisError;

///
/// IndexError
///
/// The single reported error kind of the index layer.
/// Distinguished by `class` (what went wrong) and `origin` (which layer
/// raised it). Every failed operation leaves no partially built entity
/// behind, so callers can simply discard the input that triggered it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct IndexError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl IndexError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a coercion error for a raw value rejected by a mapper.
    pub(crate) fn coercion(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Coercion, origin, message)
    }

    /// Construct the canonical "invalid value for mapping" coercion error.
    pub(crate) fn invalid_value(mapper: &str, column: &str, value: impl fmt::Debug) -> Self {
        Self::coercion(
            ErrorOrigin::Mapper,
            format!("invalid value for mapping '{mapper}' in column '{column}': {value:?}"),
        )
    }

    /// Construct a mapper-origin schema validation error.
    pub(crate) fn mapper_config(field: &str, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::SchemaValidation,
            ErrorOrigin::Mapper,
            format!("invalid mapper '{field}': {message}"),
        )
    }

    /// Construct a schema-origin validation error.
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::SchemaValidation, ErrorOrigin::Schema, message)
    }

    /// Construct a condition-origin validation error raised by `build()`.
    pub(crate) fn condition(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::SchemaValidation,
            ErrorOrigin::Condition,
            message,
        )
    }

    /// Construct a query compilation error.
    pub(crate) fn compilation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Compilation, ErrorOrigin::Query, message)
    }

    /// Construct the canonical unresolved-field compilation error.
    pub(crate) fn field_not_found(field: &str) -> Self {
        Self::compilation(format!("field '{field}' not found in schema"))
    }

    /// Construct a JSON decode error.
    pub(crate) fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Serialization, ErrorOrigin::Json, message)
    }

    /// Construct an index options error.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Config, message)
    }

    #[must_use]
    pub const fn is_coercion(&self) -> bool {
        matches!(self.class, ErrorClass::Coercion)
    }

    #[must_use]
    pub const fn is_compilation(&self) -> bool {
        matches!(self.class, ErrorClass::Compilation)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for IndexError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

///
/// ErrorClass
/// Error taxonomy shared by every layer.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    Coercion,
    SchemaValidation,
    Compilation,
    Serialization,
    Configuration,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Coercion => "coercion",
            Self::SchemaValidation => "schema_validation",
            Self::Compilation => "compilation",
            Self::Serialization => "serialization",
            Self::Configuration => "configuration",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Value,
    Mapper,
    Schema,
    Condition,
    Query,
    Json,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Value => "value",
            Self::Mapper => "mapper",
            Self::Schema => "schema",
            Self::Condition => "condition",
            Self::Query => "query",
            Self::Json => "json",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
