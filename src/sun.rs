//! Where the Sun is.
//!
//! Uses the low-precision solar coordinates from the Astronomical Almanac
//! (good to ~0.01° between 1950 and 2050).

use std::f64::consts::TAU;

use hifitime::Epoch;
use marlu::RADec;

use crate::lst::days_since_j2000;

pub fn sun_radec(epoch: Epoch) -> RADec {
    let n = days_since_j2000(epoch);

    let mean_longitude = (280.460 + 0.9856474 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.9856003 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.0000004 * n).to_radians();

    let (sin_lambda, cos_lambda) = ecliptic_longitude.sin_cos();
    RADec {
        ra: (obliquity.cos() * sin_lambda).atan2(cos_lambda).rem_euclid(TAU),
        dec: (obliquity.sin() * sin_lambda).asin(),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn june_solstice() {
        let solstice = Epoch::from_gregorian_utc_hms(2024, 6, 20, 20, 51, 0);
        let sun = sun_radec(solstice);
        assert_abs_diff_eq!(sun.dec.to_degrees(), 23.44, epsilon = 0.02);
        assert_abs_diff_eq!(sun.ra.to_degrees(), 90.0, epsilon = 0.05);
    }

    #[test]
    fn march_equinox() {
        let equinox = Epoch::from_gregorian_utc_hms(2024, 3, 20, 3, 6, 0);
        let sun = sun_radec(equinox);
        assert_abs_diff_eq!(sun.dec.to_degrees(), 0.0, epsilon = 0.02);
        assert!(sun.ra.sin().abs() < 1e-3);
    }

    #[test]
    fn december_sun_is_south() {
        let winter = Epoch::from_gregorian_utc_hms(2023, 12, 31, 12, 0, 0);
        let sun = sun_radec(winter);
        assert!(sun.dec.to_degrees() < -22.5);
    }
}
