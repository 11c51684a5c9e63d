use crate::value::Value;

///
/// ValueTag
///
/// Stable value-variant tag used by diagnostics and error messages.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    Decimal = 7,
    Text = 8,
    Date = 9,
    Timestamp = 10,
    Blob = 11,
    Uuid = 12,
    Inet = 13,
    List = 14,
}

impl ValueTag {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Text => "Text",
            Self::Date => "Date",
            Self::Timestamp => "Timestamp",
            Self::Blob => "Blob",
            Self::Uuid => "Uuid",
            Self::Inet => "Inet",
            Self::List => "List",
        }
    }
}

#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Int(_) => ValueTag::Int,
        Value::Long(_) => ValueTag::Long,
        Value::Float(_) => ValueTag::Float,
        Value::Double(_) => ValueTag::Double,
        Value::Decimal(_) => ValueTag::Decimal,
        Value::Text(_) => ValueTag::Text,
        Value::Date(_) => ValueTag::Date,
        Value::Timestamp(_) => ValueTag::Timestamp,
        Value::Blob(_) => ValueTag::Blob,
        Value::Uuid(_) => ValueTag::Uuid,
        Value::Inet(_) => ValueTag::Inet,
        Value::List(_) => ValueTag::List,
    }
}
