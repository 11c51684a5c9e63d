use crate::{error::IndexError, mapping::kind::MapperKind};
use derive_more::Display;
use std::str::FromStr;

///
/// ColumnType
///
/// Storage-engine column types a mapper may read from.
/// Collections are validated through their element type.
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub enum ColumnType {
    #[display("ascii")]
    Ascii,
    #[display("text")]
    Text,
    #[display("varchar")]
    Varchar,
    #[display("tinyint")]
    TinyInt,
    #[display("smallint")]
    SmallInt,
    #[display("int")]
    Int,
    #[display("bigint")]
    BigInt,
    #[display("counter")]
    Counter,
    #[display("varint")]
    VarInt,
    #[display("float")]
    Float,
    #[display("double")]
    Double,
    #[display("decimal")]
    Decimal,
    #[display("boolean")]
    Boolean,
    #[display("timestamp")]
    Timestamp,
    #[display("date")]
    Date,
    #[display("blob")]
    Blob,
    #[display("uuid")]
    Uuid,
    #[display("timeuuid")]
    TimeUuid,
    #[display("inet")]
    Inet,
    #[display("list<{_0}>")]
    List(Box<Self>),
    #[display("set<{_0}>")]
    Set(Box<Self>),
}

impl ColumnType {
    /// Scalar element type; collections unwrap to their element.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::List(inner) | Self::Set(inner) => inner.element(),
            other => other,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }

    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Ascii | Self::Text | Self::Varchar)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::SmallInt
                | Self::Int
                | Self::BigInt
                | Self::Counter
                | Self::VarInt
                | Self::Float
                | Self::Double
                | Self::Decimal
        )
    }
}

impl FromStr for ColumnType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();

        if let Some(inner) = collection_inner(&s, "list") {
            return Ok(Self::List(Box::new(inner.parse()?)));
        }
        if let Some(inner) = collection_inner(&s, "set") {
            return Ok(Self::Set(Box::new(inner.parse()?)));
        }

        let ty = match s.as_str() {
            "ascii" => Self::Ascii,
            "text" => Self::Text,
            "varchar" => Self::Varchar,
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "int" => Self::Int,
            "bigint" => Self::BigInt,
            "counter" => Self::Counter,
            "varint" => Self::VarInt,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "blob" => Self::Blob,
            "uuid" => Self::Uuid,
            "timeuuid" => Self::TimeUuid,
            "inet" => Self::Inet,
            other => return Err(IndexError::schema(format!("unknown column type '{other}'"))),
        };

        Ok(ty)
    }
}

fn collection_inner<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

///
/// ColumnMetadata
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMetadata {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Whether a mapper variant can read cells of this column type.
#[must_use]
pub fn supports(kind: &MapperKind, ty: &ColumnType) -> bool {
    let ty = ty.element();

    match kind {
        MapperKind::Integer
        | MapperKind::Long
        | MapperKind::Float
        | MapperKind::Double
        | MapperKind::BigDecimal { .. }
        | MapperKind::GeoPoint { .. } => ty.is_textual() || ty.is_numeric(),
        MapperKind::String { .. } | MapperKind::Text { .. } => true,
        MapperKind::Boolean => ty.is_textual() || *ty == ColumnType::Boolean,
        MapperKind::Date { .. } => {
            ty.is_textual()
                || matches!(
                    ty,
                    ColumnType::Timestamp | ColumnType::Date | ColumnType::BigInt | ColumnType::Int
                )
        }
        MapperKind::Blob => ty.is_textual() || *ty == ColumnType::Blob,
        MapperKind::Inet => ty.is_textual() || *ty == ColumnType::Inet,
        MapperKind::Uuid => {
            ty.is_textual() || matches!(ty, ColumnType::Uuid | ColumnType::TimeUuid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_collections() {
        let ty: ColumnType = "list<set<int>>".parse().unwrap();

        assert_eq!(
            ty,
            ColumnType::List(Box::new(ColumnType::Set(Box::new(ColumnType::Int))))
        );
        assert_eq!(ty.to_string(), "list<set<int>>");
        assert_eq!(ty.element(), &ColumnType::Int);
    }

    #[test]
    fn unknown_type_is_schema_error() {
        let err = "map<int,int>".parse::<ColumnType>().unwrap_err();

        assert!(err.message.contains("map<int,int>"));
    }

    #[test]
    fn support_table_checks_element_type() {
        let list_of_text = ColumnType::List(Box::new(ColumnType::Text));

        assert!(supports(&MapperKind::Integer, &list_of_text));
        assert!(!supports(&MapperKind::Integer, &ColumnType::Blob));
        assert!(supports(&MapperKind::Uuid, &ColumnType::TimeUuid));
        assert!(!supports(&MapperKind::Boolean, &ColumnType::Int));
        assert!(supports(&MapperKind::Text { analyzer: None }, &ColumnType::Blob));
    }
}
