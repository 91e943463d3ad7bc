//! Altitude/azimuth tracks of targets over a time grid.

use hifitime::Epoch;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, trace};
use marlu::RADec;
use rayon::prelude::*;

use crate::{
    catalogue::{Catalogue, Source},
    coords::{radec_to_altaz, AltAz},
    site::Site,
    sun::sun_radec,
    time::TimeGrid,
};

/// Something that can be pointed at.
#[derive(Debug, Clone)]
pub enum Target {
    Fixed(Source),

    /// The Sun moves, so its position is recomputed for every sample.
    Sun,
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Fixed(s) => &s.name,
            Target::Sun => "Sun",
        }
    }

    pub fn radec_at(&self, epoch: Epoch) -> RADec {
        match self {
            Target::Fixed(s) => s.radec,
            Target::Sun => sun_radec(epoch),
        }
    }
}

/// Altitudes and azimuths \[degrees\], one of each per time sample.
#[derive(Debug, Clone, Default)]
pub struct AltAzTrack {
    pub alt_deg: Vec<f64>,
    pub az_deg: Vec<f64>,
}

impl AltAzTrack {
    pub fn compute(target: &Target, site: &Site, grid: &TimeGrid) -> AltAzTrack {
        trace!("Computing the track of {}", target.name());
        let (alt_deg, az_deg) = grid
            .epochs()
            .iter()
            .map(|&epoch| {
                let AltAz { alt_deg, az_deg } =
                    radec_to_altaz(target.radec_at(epoch), site, epoch);
                (alt_deg, az_deg)
            })
            .unzip();
        AltAzTrack { alt_deg, az_deg }
    }

    pub fn len(&self) -> usize {
        self.alt_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alt_deg.is_empty()
    }

    /// The sample index and altitude of the highest point of the track. NaNs
    /// are ignored; `None` if there are no usable samples.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.alt_deg
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, alt)| !alt.is_nan())
            .fold(None, |best, (i, alt)| match best {
                Some((_, best_alt)) if best_alt >= alt => best,
                _ => Some((i, alt)),
            })
    }
}

/// The track of every source in the catalogue, in catalogue order. The tracks
/// are computed in parallel.
pub fn compute_tracks(
    catalogue: &Catalogue,
    site: &Site,
    grid: &TimeGrid,
    draw_progress_bar: bool,
) -> Vec<AltAzTrack> {
    debug!(
        "Computing alt/az tracks for {} sources over {} samples",
        catalogue.len(),
        grid.len()
    );
    let progress = ProgressBar::with_draw_target(
        Some(catalogue.len() as u64),
        if draw_progress_bar {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:3}/{len:3} sources ({elapsed_precise}<{eta_precise})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    )
    .with_message("Alt/az tracks");

    let tracks = catalogue
        .sources()
        .as_slice()
        .par_iter()
        .progress_with(progress.clone())
        .map(|source| AltAzTrack::compute(&Target::Fixed(source.clone()), site, grid))
        .collect();
    progress.finish();
    tracks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingKind {
    Rising,
    Setting,
}

/// A place where a track crosses an altitude threshold.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub kind: CrossingKind,

    /// The first sample on the far side of the threshold.
    pub index: usize,

    /// Linearly interpolated between the samples either side.
    pub epoch: Epoch,
}

/// Every crossing of `threshold_deg`, in time order. A sample exactly at the
/// threshold counts as above it. Samples with NaN altitudes never cross.
pub fn horizon_crossings(track: &AltAzTrack, grid: &TimeGrid, threshold_deg: f64) -> Vec<Crossing> {
    track
        .alt_deg
        .windows(2)
        .zip(grid.epochs().windows(2))
        .enumerate()
        .filter_map(|(i, (alts, epochs))| {
            let before = alts[0] - threshold_deg;
            let after = alts[1] - threshold_deg;
            let kind = if before < 0.0 && after >= 0.0 {
                CrossingKind::Rising
            } else if before >= 0.0 && after < 0.0 {
                CrossingKind::Setting
            } else {
                return None;
            };
            let fraction = before / (before - after);
            Some(Crossing {
                kind,
                index: i + 1,
                epoch: epochs[0] + (epochs[1] - epochs[0]) * fraction,
            })
        })
        .collect()
}
