use crate::error::IndexError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

///
/// DistanceUnit
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
    Yards,
    Feet,
}

impl DistanceUnit {
    const ALL: [Self; 5] = [
        Self::Meters,
        Self::Kilometers,
        Self::Miles,
        Self::Yards,
        Self::Feet,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Miles => "mi",
            Self::Yards => "yd",
            Self::Feet => "ft",
        }
    }

    const fn long_name(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Kilometers => "kilometers",
            Self::Miles => "miles",
            Self::Yards => "yards",
            Self::Feet => "feet",
        }
    }

    #[must_use]
    pub const fn meters(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Miles => 1609.344,
            Self::Yards => 0.9144,
            Self::Feet => 0.3048,
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|u| u.symbol() == s || u.long_name() == s)
    }
}

///
/// GeoDistance
///
/// A distance literal such as `10km` or `1.5mi`. A bare number is meters.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoDistance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl GeoDistance {
    #[must_use]
    pub const fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    #[must_use]
    pub fn to_meters(self) -> f64 {
        self.value * self.unit.meters()
    }
}

impl FromStr for GeoDistance {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let split = text
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);

        let invalid = || IndexError::condition(format!("invalid distance '{s}'"));
        let value: f64 = number.trim().parse().map_err(|_| invalid())?;
        let unit = if unit.is_empty() {
            DistanceUnit::Meters
        } else {
            DistanceUnit::from_symbol(unit.trim()).ok_or_else(invalid)?
        };

        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for GeoDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.symbol())
    }
}

impl Serialize for GeoDistance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeoDistance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units_and_converts_to_meters() {
        let d: GeoDistance = "10km".parse().unwrap();
        assert_eq!(d, GeoDistance::new(10.0, DistanceUnit::Kilometers));
        assert!((d.to_meters() - 10_000.0).abs() < f64::EPSILON);

        let d: GeoDistance = "1.5 miles".parse().unwrap();
        assert!((d.to_meters() - 2414.016).abs() < 1e-9);

        let d: GeoDistance = "250".parse().unwrap();
        assert_eq!(d.unit, DistanceUnit::Meters);
    }

    #[test]
    fn rejects_bad_literals() {
        assert!("km".parse::<GeoDistance>().is_err());
        assert!("10 parsecs".parse::<GeoDistance>().is_err());
        assert!("-3m".parse::<GeoDistance>().is_err());
    }

    #[test]
    fn display_uses_symbol() {
        assert_eq!(GeoDistance::new(2.5, DistanceUnit::Feet).to_string(), "2.5ft");
    }
}
