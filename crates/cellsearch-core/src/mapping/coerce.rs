use crate::{
    engine::FieldValue,
    error::{ErrorOrigin, IndexError},
    mapping::{decimal, kind::MapperKind},
    value::Value,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{net::IpAddr, str::FromStr};
use time::{Date, OffsetDateTime, PrimitiveDateTime, format_description};
use uuid::Uuid;

///
/// Value coercion
///
/// Per-variant rules turning one raw scalar value into a mapper's base
/// value. Pure functions of their input: `Null` is handled by the caller,
/// collections are flattened by the caller, and everything that reaches
/// here either coerces or fails with an "invalid value for mapping" error.
///
/// Numeric families narrow by truncation toward zero, never rounding.
/// Out-of-range integers and non-finite floats fail instead of wrapping.
///

///
/// Numeric
///
/// A raw value read as a number, before narrowing to a target family.
///

#[derive(Clone, Copy, Debug, PartialEq)]
enum Numeric {
    Integral(i64),
    Fractional(f64),
    Exact(Decimal),
}

impl Numeric {
    fn read(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::Integral(i64::from(*i))),
            Value::Long(i) => Some(Self::Integral(*i)),
            Value::Float(f) => Some(Self::Fractional(f64::from(*f))),
            Value::Double(f) => Some(Self::Fractional(*f)),
            Value::Decimal(d) => Some(Self::Exact(*d)),
            Value::Text(s) => Self::parse(s),
            _ => None,
        }
    }

    // integers first so large longs keep full precision
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Self::Integral(i));
        }

        text.parse::<f64>().ok().map(Self::Fractional)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn truncate_i64(self) -> Option<i64> {
        match self {
            Self::Integral(i) => Some(i),
            Self::Fractional(f) => {
                let t = f.trunc();
                // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
                (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
            }
            Self::Exact(d) => d.trunc().to_i64(),
        }
    }

    // non-finite results are not numbers
    #[expect(clippy::cast_precision_loss)]
    fn to_f64(self) -> Option<f64> {
        match self {
            Self::Integral(i) => Some(i as f64),
            Self::Fractional(f) => Some(f),
            Self::Exact(d) => d.to_f64(),
        }
        .filter(|f| f.is_finite())
    }

    #[expect(clippy::cast_possible_truncation)]
    fn to_f32(self) -> Option<f32> {
        self.to_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
    }

    fn to_decimal(self) -> Option<Decimal> {
        match self {
            Self::Integral(i) => Some(Decimal::from(i)),
            Self::Fractional(f) if f.is_finite() => parse_decimal(&f.to_string()),
            Self::Fractional(_) => None,
            Self::Exact(d) => Some(d),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Coerce one non-null scalar into the base value of a single-column mapper.
pub(crate) fn coerce_scalar(
    kind: &MapperKind,
    field: &str,
    column: &str,
    value: &Value,
) -> Result<FieldValue, IndexError> {
    let invalid = || IndexError::invalid_value(field, column, value);

    let base = match kind {
        MapperKind::Integer => Numeric::read(value)
            .and_then(Numeric::truncate_i64)
            .and_then(|i| i32::try_from(i).ok())
            .map(FieldValue::Int),

        MapperKind::Long => Numeric::read(value)
            .and_then(Numeric::truncate_i64)
            .map(FieldValue::Long),

        MapperKind::Float => Numeric::read(value)
            .and_then(Numeric::to_f32)
            .map(FieldValue::Float),

        MapperKind::Double => Numeric::read(value)
            .and_then(Numeric::to_f64)
            .map(FieldValue::Double),

        MapperKind::BigDecimal {
            integer_digits,
            decimal_digits,
        } => {
            let decimal = match value {
                Value::Text(s) => parse_decimal(s),
                other => Numeric::read(other).and_then(Numeric::to_decimal),
            }
            .ok_or_else(invalid)?;

            let encoded = decimal::encode_sortable(decimal, *integer_digits, *decimal_digits)
                .map_err(|err| {
                    IndexError::coercion(
                        ErrorOrigin::Mapper,
                        format!("invalid value for mapping '{field}' in column '{column}': {err}"),
                    )
                })?;

            Some(FieldValue::Str(encoded))
        }

        MapperKind::String { case_sensitive } => value.to_canonical_string().map(|s| {
            if *case_sensitive {
                FieldValue::Str(s)
            } else {
                FieldValue::Str(s.to_lowercase())
            }
        }),

        MapperKind::Text { .. } => value.to_canonical_string().map(FieldValue::Str),

        MapperKind::Boolean => coerce_bool(value).map(|b| FieldValue::Str(b.to_string())),

        MapperKind::Date { pattern } => coerce_date_millis(value, pattern).map(FieldValue::Long),

        MapperKind::Blob => coerce_blob(value).map(FieldValue::Str),

        MapperKind::Inet => match value {
            Value::Inet(ip) => Some(ip.to_string()),
            Value::Text(s) => IpAddr::from_str(s.trim()).ok().map(|ip| ip.to_string()),
            _ => None,
        }
        .map(FieldValue::Str),

        MapperKind::Uuid => match value {
            Value::Uuid(u) => Some(*u),
            Value::Text(s) => Uuid::parse_str(s.trim()).ok(),
            _ => None,
        }
        .map(|u| FieldValue::Str(u.hyphenated().to_string())),

        // two-column variant, coerced per coordinate
        MapperKind::GeoPoint { .. } => None,
    };

    base.ok_or_else(invalid)
}

/// Coerce one geo coordinate column to a double.
pub(crate) fn coerce_coordinate(
    field: &str,
    column: &str,
    value: &Value,
) -> Result<f64, IndexError> {
    Numeric::read(value)
        .and_then(Numeric::to_f64)
        .filter(|f| f.is_finite())
        .ok_or_else(|| IndexError::invalid_value(field, column, value))
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

// Date → midnight UTC, timestamps → their instant, integers → epoch millis,
// text → pattern parse (offset datetime, then local datetime as UTC, then date).
fn coerce_date_millis(value: &Value, pattern: &str) -> Option<i64> {
    match value {
        Value::Date(d) => Some(date_millis(*d)),
        Value::Timestamp(ts) => timestamp_millis(*ts),
        Value::Int(i) => Some(i64::from(*i)),
        Value::Long(i) => Some(*i),
        Value::Text(s) => parse_date_text(s.trim(), pattern),
        _ => None,
    }
}

fn parse_date_text(text: &str, pattern: &str) -> Option<i64> {
    let items = format_description::parse(pattern).ok()?;

    if let Ok(ts) = OffsetDateTime::parse(text, &items) {
        return timestamp_millis(ts);
    }
    if let Ok(local) = PrimitiveDateTime::parse(text, &items) {
        return timestamp_millis(local.assume_utc());
    }

    Date::parse(text, &items).ok().map(date_millis)
}

fn date_millis(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp() * 1000
}

fn timestamp_millis(ts: OffsetDateTime) -> Option<i64> {
    i64::try_from(ts.unix_timestamp_nanos().div_euclid(1_000_000)).ok()
}

fn coerce_blob(value: &Value) -> Option<String> {
    match value {
        Value::Blob(bytes) => Some(hex::encode(bytes)),
        Value::Text(s) => {
            let s = s.trim();
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);

            hex::decode(digits).ok().map(|_| digits.to_ascii_lowercase())
        }
        _ => None,
    }
}
