//! Local sidereal time.
//!
//! This is the linear GMST approximation used by the station's operators; it
//! is good to well under a second over decades, which is all that's needed to
//! know what's crossing the meridian.

use std::{f64::consts::PI, fmt};

use hifitime::Epoch;

/// The Julian date of J2000.0 (2000-01-01 12:00:00).
pub const J2000_JD: f64 = 2451545.0;

const GMST_AT_J2000_HOURS: f64 = 18.697374558;
const SIDEREAL_HOURS_PER_DAY: f64 = 24.06570982441908;

/// Fractional UTC days since J2000.0.
pub fn days_since_j2000(epoch: Epoch) -> f64 {
    epoch.to_jde_utc_days() - J2000_JD
}

fn wrap_hours(hours: f64) -> f64 {
    let wrapped = hours.rem_euclid(24.0);
    // rem_euclid can round a tiny negative up to exactly 24.
    if wrapped >= 24.0 {
        0.0
    } else {
        wrapped
    }
}

/// Greenwich mean sidereal time \[hours\], in [0, 24).
pub fn gmst_hours(epoch: Epoch) -> f64 {
    wrap_hours(GMST_AT_J2000_HOURS + SIDEREAL_HOURS_PER_DAY * days_since_j2000(epoch))
}

/// Local mean sidereal time \[hours\] at an east-positive longitude given in
/// degrees.
pub fn lst_hours(longitude_deg: f64, epoch: Epoch) -> f64 {
    wrap_hours(gmst_hours(epoch) + longitude_deg / 15.0)
}

/// Local mean sidereal time as an angle \[radians\].
pub fn lst_rad(longitude_rad: f64, epoch: Epoch) -> f64 {
    lst_hours(longitude_rad.to_degrees(), epoch) * PI / 12.0
}

/// A time of day split into whole hours, minutes and seconds. Each part is
/// truncated, not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Hms {
    pub fn from_hours(hours: f64) -> Hms {
        let hours = wrap_hours(hours);
        Hms {
            hours: hours as u8,
            minutes: ((hours * 60.0) % 60.0) as u8,
            seconds: ((hours * 3600.0) % 60.0) as u8,
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn gmst_at_j2000() {
        let j2000 = Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0);
        assert_abs_diff_eq!(days_since_j2000(j2000), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(gmst_hours(j2000), GMST_AT_J2000_HOURS, epsilon = 1e-9);
    }

    #[test]
    fn gmst_advances_by_a_sidereal_day_per_solar_day() {
        let t0 = Epoch::from_gregorian_utc_hms(2024, 3, 5, 0, 0, 0);
        let t1 = Epoch::from_gregorian_utc_hms(2024, 3, 6, 0, 0, 0);
        let diff = (gmst_hours(t1) - gmst_hours(t0)).rem_euclid(24.0);
        assert_abs_diff_eq!(diff, SIDEREAL_HOURS_PER_DAY - 24.0, epsilon = 1e-6);
    }

    #[test]
    fn lst_is_gmst_plus_longitude() {
        let epoch = Epoch::from_gregorian_utc_hms(2024, 3, 5, 18, 30, 0);
        let gmst = gmst_hours(epoch);
        for longitude in [-180.0, -7.9219, 0.0, 7.9219, 11.93029, 116.764, 180.0] {
            let lst = lst_hours(longitude, epoch);
            assert!((0.0..24.0).contains(&lst));
            let expected = (gmst + longitude / 15.0).rem_euclid(24.0);
            assert_abs_diff_eq!(lst, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn lst_in_radians_matches_hours() {
        let epoch = Epoch::from_gregorian_utc_hms(2024, 3, 5, 18, 30, 0);
        let longitude = 7.9219_f64;
        assert_abs_diff_eq!(
            lst_rad(longitude.to_radians(), epoch),
            lst_hours(longitude, epoch) * PI / 12.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn hms_truncates() {
        let hms = Hms::from_hours(13.5);
        assert_eq!(
            hms,
            Hms {
                hours: 13,
                minutes: 30,
                seconds: 0
            }
        );
        assert_eq!(hms.to_string(), "13:30:00");

        // 1h 2m 3.9s
        let hms = Hms::from_hours(1.0 + 2.0 / 60.0 + 3.9 / 3600.0);
        assert_eq!(hms.to_string(), "01:02:03");

        assert_eq!(Hms::from_hours(-0.5).to_string(), "23:30:00");
    }
}
