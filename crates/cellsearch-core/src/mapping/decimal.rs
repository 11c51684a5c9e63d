//! Order-preserving text encoding for arbitrary-precision decimals.
//!
//! Digits are padded to the configured integer/fraction widths and prefixed
//! with a sign byte; negative values store the nines' complement of their
//! magnitude, so byte order equals numeric order.

use rust_decimal::Decimal;

///
/// DecimalEncodeError
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DecimalEncodeError {
    IntegerDigits { found: usize, max: u32 },
    DecimalDigits { found: usize, max: u32 },
}

impl std::fmt::Display for DecimalEncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntegerDigits { found, max } => {
                write!(f, "{found} integer digits exceed the limit of {max}")
            }
            Self::DecimalDigits { found, max } => {
                write!(f, "{found} decimal digits exceed the limit of {max}")
            }
        }
    }
}

pub(crate) fn encode_sortable(
    value: Decimal,
    integer_digits: u32,
    decimal_digits: u32,
) -> Result<String, DecimalEncodeError> {
    let normalized = value.normalize();
    let negative = normalized.is_sign_negative() && !normalized.is_zero();
    let magnitude = normalized.abs().to_string();

    let (int_part, frac_part) = magnitude
        .split_once('.')
        .unwrap_or((magnitude.as_str(), ""));

    if int_part.len() > integer_digits as usize {
        return Err(DecimalEncodeError::IntegerDigits {
            found: int_part.len(),
            max: integer_digits,
        });
    }
    if frac_part.len() > decimal_digits as usize {
        return Err(DecimalEncodeError::DecimalDigits {
            found: frac_part.len(),
            max: decimal_digits,
        });
    }

    let int_width = integer_digits as usize;
    let frac_width = decimal_digits as usize;
    let int_padded = format!("{int_part:0>int_width$}");
    let frac_padded = format!("{frac_part:0<frac_width$}");

    let encoded = if negative {
        format!("0{}.{}", complement(&int_padded), complement(&frac_padded))
    } else {
        format!("1{int_padded}.{frac_padded}")
    };

    Ok(encoded)
}

fn complement(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_digit(9 - d, 10).unwrap_or(c),
            None => c,
        })
        .collect()
}
