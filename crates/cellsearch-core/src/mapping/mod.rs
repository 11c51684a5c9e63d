//! Mapper layer: value coercion, field materialization and validation for
//! one logical indexed field.

mod builder;
mod coerce;
mod column;
mod decimal;
pub mod geo;
mod kind;

#[cfg(test)]
mod tests;

use crate::{
    DEFAULT_BOOST,
    engine::{
        Analyzer, DEFAULT_ANALYZER, DocValuesType, Field, FieldKind, FieldValue, SortField,
        SortKind,
    },
    error::IndexError,
    obs::sink::{self, MetricsEvent},
    value::{Columns, Value},
};
use time::format_description;

// re-exports
pub use builder::{
    BigDecimalMapperBuilder, DateMapperBuilder, GeoPointMapperBuilder, MapperBuilder,
    MapperOptions, StringMapperBuilder, TextMapperBuilder,
};
pub use column::{ColumnMetadata, ColumnType};
pub use kind::{
    BaseFamily, DEFAULT_CASE_SENSITIVE, DEFAULT_DATE_PATTERN, DEFAULT_DECIMAL_DIGITS,
    DEFAULT_GEO_MAX_LEVELS, DEFAULT_INTEGER_DIGITS, MAX_BIGDEC_DIGITS, MAX_GEO_LEVELS, MapperKind,
    MapperMetadata,
};

pub const DEFAULT_INDEXED: bool = true;
pub const DEFAULT_SORTED: bool = false;

/// Suffix of the doc-values field materialized for sorted mappers.
pub const SORT_SUFFIX: &str = ".sort";

/// Canonical, type-coerced value produced by a mapper.
pub type BaseValue = FieldValue;

/// Name of the doc-values field backing `field`.
#[must_use]
pub fn sort_name(field: &str) -> String {
    format!("{field}{SORT_SUFFIX}")
}

///
/// Mapper
///
/// Immutable configuration and logic for one logical schema field.
/// Built once from a validated `MapperBuilder`; never mutated afterwards,
/// so a schema can be shared by concurrent writers and compilers.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Mapper {
    field: String,
    column: String,
    indexed: bool,
    sorted: bool,
    boost: f32,
    kind: MapperKind,
    mapped_columns: Vec<String>,
}

impl Mapper {
    /// Validate options against the variant and build the mapper.
    pub fn new(field: &str, options: &MapperOptions, kind: MapperKind) -> Result<Self, IndexError> {
        if field.trim().is_empty() {
            return Err(IndexError::schema("mapper field name must not be empty"));
        }

        let column = options.column.clone().unwrap_or_else(|| field.to_string());
        let indexed = options.indexed.unwrap_or(DEFAULT_INDEXED);
        let sorted = options.sorted.unwrap_or(DEFAULT_SORTED);
        let boost = options.boost.unwrap_or(DEFAULT_BOOST);

        if column.trim().is_empty() {
            return Err(IndexError::mapper_config(field, "column must not be empty"));
        }
        if !(boost.is_finite() && boost > 0.0) {
            return Err(IndexError::mapper_config(
                field,
                format!("boost must be positive and finite, found {boost}"),
            ));
        }
        if sorted && !kind.metadata().supports_sorting() {
            return Err(IndexError::mapper_config(
                field,
                format!("sorting is not supported by '{}' mappers", kind.tag()),
            ));
        }

        validate_kind(field, &kind)?;

        let mapped_columns = match &kind {
            MapperKind::GeoPoint {
                latitude,
                longitude,
                ..
            } => vec![latitude.clone(), longitude.clone()],
            _ => vec![column.clone()],
        };

        if !indexed && !sorted {
            tracing::warn!(field, "mapper is neither indexed nor sorted, it will produce no fields");
        }

        Ok(Self {
            field: field.to_string(),
            column,
            indexed,
            sorted,
            boost,
            kind,
            mapped_columns,
        })
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.indexed
    }

    #[must_use]
    pub const fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[must_use]
    pub const fn boost(&self) -> f32 {
        self.boost
    }

    #[must_use]
    pub const fn kind(&self) -> &MapperKind {
        &self.kind
    }

    #[must_use]
    pub const fn metadata(&self) -> MapperMetadata {
        self.kind.metadata()
    }

    /// Source columns consulted by the coercer.
    #[must_use]
    pub fn mapped_columns(&self) -> &[String] {
        &self.mapped_columns
    }

    /// Analyzer used for the indexed representation; `None` for untokenized
    /// variants.
    #[must_use]
    pub fn analyzer(&self) -> Option<&str> {
        match &self.kind {
            MapperKind::Text { analyzer } => Some(analyzer.as_deref().unwrap_or(DEFAULT_ANALYZER)),
            _ => None,
        }
    }

    /// Whether this mapper can read cells of the given column type.
    #[must_use]
    pub fn supports(&self, ty: &ColumnType) -> bool {
        column::supports(&self.kind, ty)
    }

    /// Fill in the schema default analyzer for text mappers that name none.
    pub(crate) fn resolve_analyzer(&mut self, default: &str) {
        if let MapperKind::Text { analyzer } = &mut self.kind {
            analyzer.get_or_insert_with(|| default.to_string());
        }
    }

    ///
    /// COERCION
    ///

    /// Coerce one raw scalar into this mapper's base value.
    ///
    /// `Null` yields `None`. Collections are rejected here; use `bases` to
    /// index each element.
    pub fn base(&self, column: &str, value: &Value) -> Result<Option<BaseValue>, IndexError> {
        let result = match value {
            Value::Null => return Ok(None),
            Value::List(_) => Err(IndexError::invalid_value(&self.field, column, value)),
            scalar => match &self.kind {
                MapperKind::GeoPoint { latitude, .. } => {
                    self.coordinate(column, scalar, column == latitude.as_str())
                }
                kind => coerce::coerce_scalar(kind, &self.field, column, scalar),
            },
        };

        match result {
            Ok(base) => Ok(Some(base)),
            Err(err) => {
                tracing::debug!(field = %self.field, column, error = %err, "coercion rejected");
                sink::record(MetricsEvent::CoercionRejected { field: &self.field });
                Err(err)
            }
        }
    }

    /// Coerce a raw value into zero or more bases, one per collection element.
    pub fn bases(&self, column: &str, value: &Value) -> Result<Vec<BaseValue>, IndexError> {
        match value {
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(base) = self.base(column, item)? {
                        out.push(base);
                    }
                }
                Ok(out)
            }
            scalar => Ok(self.base(column, scalar)?.into_iter().collect()),
        }
    }

    fn coordinate(&self, column: &str, value: &Value, latitude: bool) -> Result<BaseValue, IndexError> {
        let f = coerce::coerce_coordinate(&self.field, column, value)?;
        let valid = if latitude {
            geo::is_valid_latitude(f)
        } else {
            geo::is_valid_longitude(f)
        };

        if valid {
            Ok(FieldValue::Double(f))
        } else {
            Err(IndexError::invalid_value(&self.field, column, value))
        }
    }

    ///
    /// MATERIALIZATION
    ///

    /// Searchable representation of a base value; `None` when not indexed.
    pub fn indexed_field(&self, name: &str, base: BaseValue) -> Result<Option<Field>, IndexError> {
        if !self.indexed {
            return Ok(None);
        }

        let kind = match (&self.kind, &base) {
            (MapperKind::Integer, FieldValue::Int(_)) => FieldKind::IntPoint,
            (MapperKind::Long | MapperKind::Date { .. }, FieldValue::Long(_)) => FieldKind::LongPoint,
            (MapperKind::Float, FieldValue::Float(_)) => FieldKind::FloatPoint,
            (MapperKind::Double, FieldValue::Double(_)) => FieldKind::DoublePoint,
            (MapperKind::Text { .. }, FieldValue::Str(_)) => FieldKind::Text {
                analyzer: self.analyzer().unwrap_or(DEFAULT_ANALYZER).to_string(),
            },
            (MapperKind::GeoPoint { .. }, FieldValue::GeoPoint { .. }) => FieldKind::LatLonPoint,
            (kind, FieldValue::Str(_)) if kind.metadata().family == BaseFamily::Keyword => {
                FieldKind::Keyword
            }
            _ => return Err(self.base_mismatch(name, &base)),
        };

        Ok(Some(Field::indexed(name, base, kind, self.boost)))
    }

    /// Doc-values representation of a base value; `None` when not sorted.
    pub fn sorted_field(
        &self,
        name: &str,
        base: BaseValue,
        multi_valued: bool,
    ) -> Result<Option<Field>, IndexError> {
        if !self.sorted {
            return Ok(None);
        }

        let single = self
            .metadata()
            .doc_values()
            .ok_or_else(|| self.base_mismatch(name, &base))?;
        let matches = match single {
            DocValuesType::Sorted | DocValuesType::SortedSet => base.as_str().is_some(),
            DocValuesType::Numeric | DocValuesType::SortedNumeric => base.is_numeric(),
        };
        if !matches {
            return Err(self.base_mismatch(name, &base));
        }

        let ty = if multi_valued { single.multi_valued() } else { single };

        Ok(Some(Field::doc_values(name, base, ty)))
    }

    /// Sort descriptor for query-time ordering. Requires `sorted=true`.
    pub fn sort_field(&self, name: &str, reverse: bool) -> Result<SortField, IndexError> {
        let kind = self.sort_kind().ok_or_else(|| {
            IndexError::compilation(format!("field '{}' is not sorted", self.field))
        })?;

        Ok(SortField::new(name, kind, reverse))
    }

    fn sort_kind(&self) -> Option<SortKind> {
        if self.sorted {
            self.metadata().sort
        } else {
            None
        }
    }

    /// Materialize every engine field this mapper produces for one row.
    ///
    /// Indexed fields are named after the logical field, doc-values fields
    /// after `sort_name(field)`.
    pub fn fields(&self, columns: &Columns) -> Result<Vec<Field>, IndexError> {
        let mut fields = Vec::new();

        if let MapperKind::GeoPoint {
            latitude,
            longitude,
            max_levels,
        } = &self.kind
        {
            if let Some((lat, lon)) = self.geo_base(columns, latitude, longitude)? {
                let point = FieldValue::GeoPoint {
                    latitude: lat,
                    longitude: lon,
                };
                if let Some(field) = self.indexed_field(&self.field, point)? {
                    fields.push(field);
                    fields.push(Field::indexed(
                        &self.field,
                        FieldValue::Str(geo::geohash(lat, lon, *max_levels)),
                        FieldKind::GeoHash,
                        self.boost,
                    ));
                }
            }
        } else {
            let value = columns.get(&self.column).unwrap_or(&Value::Null);
            let multi_valued = matches!(value, Value::List(_));
            let sort_name = sort_name(&self.field);

            for base in self.bases(&self.column, value)? {
                if let Some(field) = self.sorted_field(&sort_name, base.clone(), multi_valued)? {
                    fields.push(field);
                }
                if let Some(field) = self.indexed_field(&self.field, base)? {
                    fields.push(field);
                }
            }
        }

        tracing::debug!(field = %self.field, fields = fields.len(), "fields materialized");
        sink::record(MetricsEvent::FieldsMaterialized {
            field: &self.field,
            fields: fields.len() as u64,
        });

        Ok(fields)
    }

    // Both coordinates absent means no point; exactly one absent is invalid.
    fn geo_base(
        &self,
        columns: &Columns,
        latitude: &str,
        longitude: &str,
    ) -> Result<Option<(f64, f64)>, IndexError> {
        let lat = columns.get(latitude).unwrap_or(&Value::Null);
        let lon = columns.get(longitude).unwrap_or(&Value::Null);

        match (self.base(latitude, lat)?, self.base(longitude, lon)?) {
            (None, None) => Ok(None),
            (Some(FieldValue::Double(lat)), Some(FieldValue::Double(lon))) => Ok(Some((lat, lon))),
            (None, Some(_)) => Err(IndexError::invalid_value(&self.field, latitude, lat)),
            _ => Err(IndexError::invalid_value(&self.field, longitude, lon)),
        }
    }

    fn base_mismatch(&self, name: &str, base: &BaseValue) -> IndexError {
        IndexError::invalid_value(&self.field, name, base)
    }
}

// Variant-specific option checks, run once at build time.
fn validate_kind(field: &str, kind: &MapperKind) -> Result<(), IndexError> {
    match kind {
        MapperKind::BigDecimal {
            integer_digits,
            decimal_digits,
        } => {
            for (name, digits) in [
                ("integer_digits", *integer_digits),
                ("decimal_digits", *decimal_digits),
            ] {
                if !(1..=MAX_BIGDEC_DIGITS).contains(&digits) {
                    return Err(IndexError::mapper_config(
                        field,
                        format!("{name} must be in 1..={MAX_BIGDEC_DIGITS}, found {digits}"),
                    ));
                }
            }
        }
        MapperKind::Text {
            analyzer: Some(name),
        } => {
            if Analyzer::from_name(name).is_none() {
                return Err(IndexError::mapper_config(
                    field,
                    format!("unknown analyzer '{name}'"),
                ));
            }
        }
        MapperKind::Date { pattern } => {
            format_description::parse(pattern).map_err(|err| {
                IndexError::mapper_config(field, format!("invalid date pattern '{pattern}': {err}"))
            })?;
        }
        MapperKind::GeoPoint {
            latitude,
            longitude,
            max_levels,
        } => {
            if latitude.trim().is_empty() {
                return Err(IndexError::mapper_config(field, "latitude column is required"));
            }
            if longitude.trim().is_empty() {
                return Err(IndexError::mapper_config(field, "longitude column is required"));
            }
            if !(1..=MAX_GEO_LEVELS).contains(max_levels) {
                return Err(IndexError::mapper_config(
                    field,
                    format!("max_levels must be in 1..={MAX_GEO_LEVELS}, found {max_levels}"),
                ));
            }
        }
        _ => {}
    }

    Ok(())
}
