//! Coordinate conversions: equatorial to horizon, galactic to equatorial, and
//! the unit guessing the command-line tools do on user-supplied angles.

use std::f64::consts::{FRAC_PI_2, TAU};

use hifitime::Epoch;
use lazy_static::lazy_static;
use marlu::{HADec, RADec};
use nalgebra::{Matrix3, Vector3};

use crate::{lst::lst_rad, site::Site};

lazy_static! {
    /// Rotates ICRS unit vectors into galactic ones.
    static ref ICRS_TO_GALACTIC: Matrix3<f64> = Matrix3::new(
        -0.0548755604162154, -0.8734370902348850, -0.4838350155487132,
        0.4941094278755837, -0.4448296299600112, 0.7469822444972189,
        -0.8676661490190047, -0.1980763734312015, 0.4559837761750669,
    );
}

/// Horizon coordinates \[degrees\]. Azimuth is measured from north through
/// east and lies in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    pub alt_deg: f64,
    pub az_deg: f64,
}

/// Where a fixed equatorial position appears in the sky of `site` at
/// `epoch`. No precession, nutation or refraction is applied.
pub fn radec_to_altaz(radec: RADec, site: &Site, epoch: Epoch) -> AltAz {
    let lst = lst_rad(site.position.longitude_rad, epoch);
    hadec_to_altaz(radec.to_hadec(lst), site.position.latitude_rad)
}

pub fn hadec_to_altaz(hadec: HADec, latitude_rad: f64) -> AltAz {
    let azel = hadec.to_azel(latitude_rad);
    AltAz {
        alt_deg: azel.el.to_degrees(),
        az_deg: azel.az.to_degrees().rem_euclid(360.0),
    }
}

pub fn galactic_to_icrs(l_deg: f64, b_deg: f64) -> RADec {
    let (l, b) = (l_deg.to_radians(), b_deg.to_radians());
    let galactic = Vector3::new(b.cos() * l.cos(), b.cos() * l.sin(), b.sin());
    let icrs = ICRS_TO_GALACTIC.transpose() * galactic;
    RADec {
        ra: icrs.y.atan2(icrs.x).rem_euclid(TAU),
        dec: icrs.z.clamp(-1.0, 1.0).asin(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Degrees,
}

/// A right ascension bigger than a full turn in radians must be in degrees.
/// Returns the value in radians along with the unit that was assumed.
pub fn interpret_ra(value: f64) -> (f64, AngleUnit) {
    if value > TAU {
        (value.to_radians(), AngleUnit::Degrees)
    } else {
        (value, AngleUnit::Radians)
    }
}

/// A declination whose magnitude is beyond the pole in radians must be in
/// degrees.
pub fn interpret_dec(value: f64) -> (f64, AngleUnit) {
    if value.abs() > FRAC_PI_2 {
        (value.to_radians(), AngleUnit::Degrees)
    } else {
        (value, AngleUnit::Radians)
    }
}

pub fn hms_to_deg(hours: f64, minutes: f64, seconds: f64) -> f64 {
    15.0 * (hours + minutes / 60.0 + seconds / 3600.0)
}

/// `negative` applies to the whole angle, so that -0d30m can be expressed.
pub fn dms_to_deg(negative: bool, degrees: f64, minutes: f64, seconds: f64) -> f64 {
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
