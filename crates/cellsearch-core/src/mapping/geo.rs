//! Coordinate validation and geohash encoding for geo-point mappers.

const GEOHASH_BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[must_use]
pub fn is_valid_latitude(latitude: f64) -> bool {
    (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
}

#[must_use]
pub fn is_valid_longitude(longitude: f64) -> bool {
    (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

/// Encode a point as a geohash of `precision` characters.
#[must_use]
pub fn geohash(latitude: f64, longitude: f64, precision: u8) -> String {
    let (mut lat_lo, mut lat_hi) = (MIN_LATITUDE, MAX_LATITUDE);
    let (mut lon_lo, mut lon_hi) = (MIN_LONGITUDE, MAX_LONGITUDE);
    let mut hash = String::with_capacity(usize::from(precision));
    let mut bits = 0usize;
    let mut bit_count = 0;
    let mut even = true;

    while hash.len() < usize::from(precision) {
        // even bits refine longitude, odd bits latitude
        let (value, lo, hi) = if even {
            (longitude, &mut lon_lo, &mut lon_hi)
        } else {
            (latitude, &mut lat_lo, &mut lat_hi)
        };
        let mid = (*lo + *hi) / 2.0;
        if value >= mid {
            bits = (bits << 1) | 1;
            *lo = mid;
        } else {
            bits <<= 1;
            *hi = mid;
        }

        even = !even;
        bit_count += 1;
        if bit_count == 5 {
            hash.push(char::from(GEOHASH_BASE32[bits]));
            bits = 0;
            bit_count = 0;
        }
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geohash_matches_reference_point() {
        assert_eq!(geohash(57.64911, 10.40744, 11), "u4pruydqqvj");
        assert_eq!(geohash(57.64911, 10.40744, 3), "u4p");
    }

    #[test]
    fn coordinate_ranges_are_inclusive() {
        assert!(is_valid_latitude(90.0));
        assert!(!is_valid_latitude(90.5));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(f64::NAN));
    }
}
