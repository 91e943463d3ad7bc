//! Sky-noise-limited sensitivity.
//!
//! The radiometer equation, with the system temperature taken to be the
//! (convolved) sky temperature:
//!
//! S_min = SNR * T_sys * 2 k / (A_eff * sqrt(n_pol * t_obs * Δν))
//!
//! with k expressed as 1380 Jy m² K⁻¹ and two polarisations.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressIterator, ProgressStyle};
use log::{debug, warn};
use marlu::RADec;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::{
    coords::galactic_to_icrs,
    tsky::{SkyTempRow, SkyTemperature, TskyError},
};

/// Boltzmann's constant in Jy m² K⁻¹.
pub const BOLTZMANN_JY: f64 = 1380.0;

/// The LOFAR station bandwidth used for these estimates \[Hz\].
pub const LOFAR_BANDWIDTH_HZ: f64 = 3.66e6;

#[derive(Error, Debug, PartialEq)]
pub enum FitError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("A degree {degree} polynomial needs at least {} points, got {points}", .degree + 1)]
    NotEnoughPoints { degree: usize, points: usize },

    #[error("Least-squares solve failed: {0}")]
    Solve(String),
}

/// Everything about an observation, other than the sky and the array, that
/// the sensitivity depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationSetup {
    pub snr: f64,
    pub bandwidth_hz: f64,
    pub tobs_s: f64,
}

impl ObservationSetup {
    /// Six hours on a single target, to an SNR of 1.
    pub const SINGLE_TARGET: ObservationSetup = ObservationSetup {
        snr: 1.0,
        bandwidth_hz: LOFAR_BANDWIDTH_HZ,
        tobs_s: 6.0 * 3600.0,
    };

    /// 80 minutes per pointing, to an SNR of 10.
    pub const GALACTIC_SWEEP: ObservationSetup = ObservationSetup {
        snr: 10.0,
        bandwidth_hz: LOFAR_BANDWIDTH_HZ,
        tobs_s: 60.0 * 80.0,
    };
}

/// The minimum detectable flux density \[Jy\].
pub fn sens_limit(snr: f64, tsys_k: f64, aeff_m2: f64, bandwidth_hz: f64, tobs_s: f64) -> f64 {
    let numerator = snr * tsys_k * BOLTZMANN_JY * 2.0;
    let denominator = aeff_m2 * (2.0 * tobs_s * bandwidth_hz).sqrt();
    numerator / denominator
}

/// `n` evenly-spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Station effective areas \[m²\] for `n` ascending frequencies between 100
/// and 190 MHz.
pub fn effective_areas(n: usize) -> Vec<f64> {
    linspace(2400.0, 1422.0, n)
}

/// Sensitivity as a function of frequency for one pointing.
#[derive(Debug, Clone)]
pub struct SensitivityCurve {
    pub freqs_mhz: Vec<f64>,
    pub sens_jy: Vec<f64>,
}

impl SensitivityCurve {
    pub fn from_sky_temps(rows: &[SkyTempRow], setup: &ObservationSetup) -> SensitivityCurve {
        let aeffs = effective_areas(rows.len());
        let (freqs_mhz, sens_jy) = rows
            .iter()
            .zip(aeffs)
            .map(|(row, aeff)| {
                (
                    row.freq_mhz,
                    sens_limit(
                        setup.snr,
                        row.conv_temp_k,
                        aeff,
                        setup.bandwidth_hz,
                        setup.tobs_s,
                    ),
                )
            })
            .unzip();
        SensitivityCurve { freqs_mhz, sens_jy }
    }

    pub fn sens_mjy(&self) -> Vec<f64> {
        self.sens_jy.iter().map(|s| s * 1000.0).collect()
    }

    /// The best (lowest) sensitivity \[mJy\].
    pub fn min_mjy(&self) -> Option<f64> {
        self.sens_jy
            .iter()
            .copied()
            .filter(|s| !s.is_nan())
            .reduce(f64::min)
            .map(|s| s * 1000.0)
    }
}

/// Least-squares polynomial coefficients, lowest order first.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() <= degree {
        return Err(FitError::NotEnoughPoints {
            degree,
            points: x.len(),
        });
    }

    let vandermonde = DMatrix::from_fn(x.len(), degree + 1, |i, j| x[i].powi(j as i32));
    let y = DVector::from_column_slice(y);
    let coeffs = vandermonde
        .svd(true, true)
        .solve(&y, 1e-12)
        .map_err(|e| FitError::Solve(e.to_string()))?;
    Ok(coeffs.iter().copied().collect())
}

/// Evaluate coefficients from [`polyfit`] at `x`.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// A degree-5 fit of `y` against galactic latitude, evaluated on 1000 points
/// from 0 to 75 degrees.
pub fn smooth(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>), FitError> {
    let coeffs = polyfit(x, y, 5)?;
    let smooth_x = linspace(0.0, 75.0, 1000);
    let smooth_y = smooth_x.iter().map(|&x| polyval(&coeffs, x)).collect();
    Ok((smooth_x, smooth_y))
}

#[derive(Debug, Clone)]
pub struct GalacticPointing {
    pub l_deg: f64,
    pub b_deg: f64,
    pub radec: RADec,
    pub mean_conv_temp_k: f64,
    pub sens_jy: f64,
}

/// Sensitivities along a line from the galactic plane (b = 0) to b = 75°,
/// with the longitude rising from 0 to `longitude_deg` along the way. Pointings
/// whose sky temperatures can't be determined are skipped with a warning.
pub fn galactic_sweep(
    tsky: &dyn SkyTemperature,
    longitude_deg: f64,
    num_points: usize,
    setup: &ObservationSetup,
    aeff_m2: f64,
    draw_progress_bar: bool,
) -> Vec<GalacticPointing> {
    let latitudes = linspace(0.0, 75.0, num_points);
    let longitudes = linspace(0.0, longitude_deg, num_points);

    let progress = ProgressBar::with_draw_target(
        Some(num_points as u64),
        if draw_progress_bar {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} pointings ({elapsed_precise}<{eta_precise})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    )
    .with_message(format!("l = {longitude_deg}"));

    let pointings = longitudes
        .into_iter()
        .zip(latitudes)
        .progress_with(progress.clone())
        .filter_map(|(l_deg, b_deg)| {
            let radec = galactic_to_icrs(l_deg, b_deg);
            debug!(
                "l = {l_deg:.2}, b = {b_deg:.2} -> RA {:.4} rad, Dec {:.4} rad",
                radec.ra, radec.dec
            );
            match mean_conv_temp(tsky, radec) {
                Ok(mean_conv_temp_k) => Some(GalacticPointing {
                    l_deg,
                    b_deg,
                    radec,
                    mean_conv_temp_k,
                    sens_jy: sens_limit(
                        setup.snr,
                        mean_conv_temp_k,
                        aeff_m2,
                        setup.bandwidth_hz,
                        setup.tobs_s,
                    ),
                }),
                Err(e) => {
                    warn!("Skipping l = {l_deg:.2}, b = {b_deg:.2}: {e}");
                    None
                }
            }
        })
        .collect();
    progress.finish();
    pointings
}

fn mean_conv_temp(tsky: &dyn SkyTemperature, pointing: RADec) -> Result<f64, TskyError> {
    let rows = tsky.sky_temperatures(pointing, None)?;
    if rows.is_empty() {
        return Err(TskyError::NoRows);
    }
    Ok(rows.iter().map(|r| r.conv_temp_k).sum::<f64>() / rows.len() as f64)
}
