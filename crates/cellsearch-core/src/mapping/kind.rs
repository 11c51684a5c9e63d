use crate::engine::{DocValuesType, SortKind};

/// Default date pattern, `time` format-description syntax.
pub const DEFAULT_DATE_PATTERN: &str = "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:3] [offset_hour sign:mandatory][offset_minute]";

pub const DEFAULT_INTEGER_DIGITS: u32 = 32;
pub const DEFAULT_DECIMAL_DIGITS: u32 = 32;
/// Upper bound on either bigdec digit limit; the sortable form is that wide.
pub const MAX_BIGDEC_DIGITS: u32 = 1_000;
pub const DEFAULT_CASE_SENSITIVE: bool = true;
pub const DEFAULT_GEO_MAX_LEVELS: u8 = 11;
pub const MAX_GEO_LEVELS: u8 = 12;

///
/// MapperKind
///
/// The variant of a mapper: fixes the base value's semantic type and the
/// coercion rule. Variant-specific options live on the variant.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MapperKind {
    Integer,
    Long,
    Float,
    Double,
    BigDecimal {
        integer_digits: u32,
        decimal_digits: u32,
    },
    String {
        case_sensitive: bool,
    },
    Text {
        /// `None` until the schema resolves its default analyzer.
        analyzer: Option<String>,
    },
    Boolean,
    Date {
        pattern: String,
    },
    Blob,
    Inet,
    Uuid,
    GeoPoint {
        latitude: String,
        longitude: String,
        max_levels: u8,
    },
}

impl MapperKind {
    /// JSON `type` tag of this variant.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::BigDecimal { .. } => "bigdec",
            Self::String { .. } => "string",
            Self::Text { .. } => "text",
            Self::Boolean => "boolean",
            Self::Date { .. } => "date",
            Self::Blob => "blob",
            Self::Inet => "inet",
            Self::Uuid => "uuid",
            Self::GeoPoint { .. } => "geo_point",
        }
    }

    /// Return the capability descriptor for this variant.
    #[must_use]
    pub const fn metadata(&self) -> MapperMetadata {
        match self {
            Self::Integer => MapperMetadata::numeric(SortKind::Int),
            Self::Long | Self::Date { .. } => MapperMetadata::numeric(SortKind::Long),
            Self::Float => MapperMetadata::numeric(SortKind::Float),
            Self::Double => MapperMetadata::numeric(SortKind::Double),
            Self::BigDecimal { .. }
            | Self::String { .. }
            | Self::Boolean
            | Self::Blob
            | Self::Inet
            | Self::Uuid => MapperMetadata::keyword(),
            Self::Text { .. } => MapperMetadata {
                family: BaseFamily::Textual,
                sort: None,
                analyzed: true,
            },
            Self::GeoPoint { .. } => MapperMetadata {
                family: BaseFamily::Spatial,
                sort: None,
                analyzed: false,
            },
        }
    }
}

///
/// BaseFamily
///
/// Coarse classification of a mapper's base values, used by the query
/// compiler to decide which conditions a field accepts.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BaseFamily {
    Numeric,
    /// Untokenized strings.
    Keyword,
    /// Tokenized strings.
    Textual,
    Spatial,
}

///
/// MapperMetadata
///
/// Capability metadata shared by the materializer, the schema validator and
/// the query compiler.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapperMetadata {
    pub family: BaseFamily,
    /// Sort interpretation; `None` when the variant has no doc-values support.
    pub sort: Option<SortKind>,
    pub analyzed: bool,
}

impl MapperMetadata {
    const fn numeric(sort: SortKind) -> Self {
        Self {
            family: BaseFamily::Numeric,
            sort: Some(sort),
            analyzed: false,
        }
    }

    const fn keyword() -> Self {
        Self {
            family: BaseFamily::Keyword,
            sort: Some(SortKind::String),
            analyzed: false,
        }
    }

    #[must_use]
    pub const fn supports_sorting(self) -> bool {
        self.sort.is_some()
    }

    /// Whether string-pattern conditions (wildcard, prefix, fuzzy, ...) apply.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self.family, BaseFamily::Keyword | BaseFamily::Textual)
    }

    /// Single-valued doc-values kind for this variant.
    #[must_use]
    pub const fn doc_values(self) -> Option<DocValuesType> {
        match self.sort {
            Some(SortKind::String) => Some(DocValuesType::Sorted),
            Some(_) => Some(DocValuesType::Numeric),
            None => None,
        }
    }
}
