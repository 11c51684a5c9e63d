use std::fmt;

///
/// SortKind
///
/// Doc-values interpretation the engine uses when comparing documents.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SortKind {
    Int,
    Long,
    Float,
    Double,
    String,
}

///
/// SortField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortField {
    pub field: String,
    pub kind: SortKind,
    pub reverse: bool,
}

impl SortField {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: SortKind, reverse: bool) -> Self {
        Self {
            field: field.into(),
            kind,
            reverse,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:?}: \"{}\">", self.kind, self.field)?;
        if self.reverse {
            write!(f, "!")?;
        }
        Ok(())
    }
}
