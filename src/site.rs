//! Observatory positions.

use lazy_static::lazy_static;
use marlu::LatLngHeight;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SiteError {
    #[error("Unknown site '{name}'; known sites are: {known}")]
    Unknown { name: String, known: String },
}

#[derive(Debug, Clone)]
pub struct Site {
    /// The short name used on the command line, e.g. "I-LOFAR".
    pub name: String,

    pub description: String,

    /// Longitudes are east positive.
    pub position: LatLngHeight,
}

lazy_static! {
    pub static ref I_LOFAR: Site = Site {
        name: "I-LOFAR".to_string(),
        description: "LOFAR Station IE613".to_string(),
        position: LatLngHeight {
            longitude_rad: 7.9219_f64.to_radians(),
            latitude_rad: 53.0950_f64.to_radians(),
            height_metres: 72.0,
        },
    };

    pub static ref LOFAR_SE: Site = Site {
        name: "LOFAR-SE".to_string(),
        description: "LOFAR Station SE607".to_string(),
        position: LatLngHeight {
            longitude_rad: 11.93029_f64.to_radians(),
            latitude_rad: 57.39876_f64.to_radians(),
            height_metres: 18.0,
        },
    };
}

impl Site {
    pub fn builtin() -> [&'static Site; 2] {
        [&*I_LOFAR, &*LOFAR_SE]
    }

    /// Look up a built-in site, ignoring case.
    pub fn by_name(name: &str) -> Result<Site, SiteError> {
        Site::builtin()
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| SiteError::Unknown {
                name: name.to_string(),
                known: Site::builtin()
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn custom(longitude_deg: f64, latitude_deg: f64, height_metres: f64) -> Site {
        Site {
            name: "custom".to_string(),
            description: format!("Site at ({longitude_deg}°, {latitude_deg}°)"),
            position: LatLngHeight {
                longitude_rad: longitude_deg.to_radians(),
                latitude_rad: latitude_deg.to_radians(),
                height_metres,
            },
        }
    }

    pub fn longitude_deg(&self) -> f64 {
        self.position.longitude_rad.to_degrees()
    }

    pub fn latitude_deg(&self) -> f64 {
        self.position.latitude_rad.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let site = Site::by_name("i-lofar").unwrap();
        assert_eq!(site.name, "I-LOFAR");
        assert_abs_diff_eq!(site.longitude_deg(), 7.9219, epsilon = 1e-12);
        assert_abs_diff_eq!(site.latitude_deg(), 53.0950, epsilon = 1e-12);

        let site = Site::by_name("LOFAR-SE").unwrap();
        assert_abs_diff_eq!(site.longitude_deg(), 11.93029, epsilon = 1e-12);
    }

    #[test]
    fn unknown_site_lists_the_known_ones() {
        let err = Site::by_name("Parkes").unwrap_err();
        assert_eq!(
            err,
            SiteError::Unknown {
                name: "Parkes".to_string(),
                known: "I-LOFAR, LOFAR-SE".to_string()
            }
        );
    }
}
