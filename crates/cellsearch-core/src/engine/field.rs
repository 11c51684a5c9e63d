use derive_more::Display;
use std::fmt;

///
/// FieldValue
///
/// Typed payload of one engine field or query term.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    GeoPoint { latitude: f64, longitude: f64 },
}

impl FieldValue {
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int(_) | Self::Long(_) | Self::Float(_) | Self::Double(_)
        )
    }

    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        if let Self::Str(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::GeoPoint {
                latitude,
                longitude,
            } => write!(f, "{latitude},{longitude}"),
        }
    }
}

///
/// DocValuesType
///
/// Column-oriented per-document representation used for sorting.
/// The multi-valued kinds are used for collection cells.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum DocValuesType {
    #[display("NUMERIC")]
    Numeric,
    #[display("SORTED_NUMERIC")]
    SortedNumeric,
    #[display("SORTED")]
    Sorted,
    #[display("SORTED_SET")]
    SortedSet,
}

impl DocValuesType {
    /// Multi-valued counterpart used when a cell holds a collection.
    #[must_use]
    pub const fn multi_valued(self) -> Self {
        match self {
            Self::Numeric | Self::SortedNumeric => Self::SortedNumeric,
            Self::Sorted | Self::SortedSet => Self::SortedSet,
        }
    }
}

///
/// FieldKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    IntPoint,
    LongPoint,
    FloatPoint,
    DoublePoint,
    /// Untokenized string term.
    Keyword,
    /// Tokenized string, analyzed with the named analyzer.
    Text { analyzer: String },
    LatLonPoint,
    /// Geohash prefix terms for spatial prefix-tree lookups.
    GeoHash,
    DocValues(DocValuesType),
}

///
/// Field
///
/// One engine field attached to a document. Never stored: storage is owned
/// by the wide-column store, the index only searches and sorts.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub kind: FieldKind,
    pub stored: bool,
    pub boost: f32,
}

impl Field {
    /// Build a searchable (indexed, non-stored) field.
    #[must_use]
    pub fn indexed(name: impl Into<String>, value: FieldValue, kind: FieldKind, boost: f32) -> Self {
        Self {
            name: name.into(),
            value,
            kind,
            stored: false,
            boost,
        }
    }

    /// Build a doc-values field. Doc values never carry an index-time boost.
    #[must_use]
    pub fn doc_values(name: impl Into<String>, value: FieldValue, ty: DocValuesType) -> Self {
        Self {
            name: name.into(),
            value,
            kind: FieldKind::DocValues(ty),
            stored: false,
            boost: 1.0,
        }
    }

    #[must_use]
    pub const fn doc_values_type(&self) -> Option<DocValuesType> {
        if let FieldKind::DocValues(ty) = self.kind {
            Some(ty)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_tokenized(&self) -> bool {
        matches!(self.kind, FieldKind::Text { .. })
    }

    /// Numeric payload, if this field carries one.
    #[must_use]
    pub const fn numeric_value(&self) -> Option<&FieldValue> {
        if self.value.is_numeric() {
            Some(&self.value)
        } else {
            None
        }
    }
}

///
/// Document
///
/// Ordered set of engine fields produced for one written row.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn extend(&mut self, fields: impl IntoIterator<Item = Field>) {
        self.fields.extend(fields);
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// All fields materialized under one name, in insertion order.
    pub fn get<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.name == name)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
