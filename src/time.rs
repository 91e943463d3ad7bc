//! Observation times: parsing the start time, building the sample grid and
//! formatting epochs for schedules and plot titles.

use std::str::FromStr;

use hifitime::{Duration, Epoch, Weekday};
use log::warn;
use thiserror::Error;
use vec1::Vec1;

#[derive(Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Incorrect date format, should be YYYY-MM-DD HH:MM:SS (got '{0}')")]
    Format(String),

    #[error("A time grid needs at least one sample")]
    EmptyGrid,

    #[error("The observing window must be a positive number of hours (got {0})")]
    Window(f64),

    #[error("Time grid epochs must be in ascending order")]
    Unordered,
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse an observation start time of the form `YYYY-MM-DD HH:MM:SS` (UTC).
/// The ISO 8601 forms hifitime understands (e.g. with a `T` separator) are
/// also accepted.
pub fn parse_observation_start(s: &str) -> Result<Epoch, TimeError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimeError::Format(s.to_string()));
    }
    Epoch::from_format_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| Epoch::from_str(trimmed))
        .map_err(|_| TimeError::Format(s.to_string()))
}

/// The current UTC time according to the system clock.
pub fn now() -> Epoch {
    Epoch::now().unwrap_or_else(|e| {
        warn!("Couldn't read the system clock ({e}); using the Unix epoch");
        Epoch::from_unix_seconds(0.0)
    })
}

/// Evenly-spaced observation times. There is always at least one sample.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    epochs: Vec1<Epoch>,
}

impl TimeGrid {
    /// `num_samples` epochs from `start` to `start + window_hours` inclusive.
    pub fn linspace(
        start: Epoch,
        window_hours: f64,
        num_samples: usize,
    ) -> Result<TimeGrid, TimeError> {
        if !window_hours.is_finite() || (num_samples > 1 && window_hours <= 0.0) {
            return Err(TimeError::Window(window_hours));
        }
        let step_hours = match num_samples {
            0 => return Err(TimeError::EmptyGrid),
            1 => 0.0,
            n => window_hours / (n - 1) as f64,
        };
        let epochs = (0..num_samples)
            .map(|i| start + Duration::from_seconds(i as f64 * step_hours * 3600.0))
            .collect();
        Ok(TimeGrid {
            epochs: Vec1::try_from_vec(epochs).map_err(|_| TimeError::EmptyGrid)?,
        })
    }

    pub fn from_epochs(epochs: Vec<Epoch>) -> Result<TimeGrid, TimeError> {
        if epochs.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(TimeError::Unordered);
        }
        Ok(TimeGrid {
            epochs: Vec1::try_from_vec(epochs).map_err(|_| TimeError::EmptyGrid)?,
        })
    }

    pub fn epochs(&self) -> &Vec1<Epoch> {
        &self.epochs
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Always false; a grid can't be constructed empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> Epoch {
        *self.epochs.first()
    }

    pub fn last(&self) -> Epoch {
        *self.epochs.last()
    }

    pub fn get(&self, index: usize) -> Option<Epoch> {
        self.epochs.get(index).copied()
    }

    /// The hours elapsed between the first sample and every sample.
    pub fn hours_since_start(&self) -> Vec<f64> {
        let first = self.first();
        self.epochs
            .iter()
            .map(|&e| (e - first).to_seconds() / 3600.0)
            .collect()
    }
}

/// `YYYY-MM-DDTHH:MM`, the format schedule lines are printed in.
pub fn schedule_timefmt(epoch: Epoch) -> String {
    let (y, m, d, h, min, _, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}T{h:02}:{min:02}")
}

pub fn hhmm(epoch: Epoch) -> String {
    let (_, _, _, h, min, _, _) = epoch.to_gregorian_utc();
    format!("{h:02}:{min:02}")
}

pub fn weekday_name(epoch: Epoch) -> &'static str {
    match epoch.weekday_utc() {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}

pub fn month_name(epoch: Epoch) -> &'static str {
    let (_, month, ..) = epoch.to_gregorian_utc();
    MONTHS[usize::from(month.clamp(1, 12)) - 1]
}

pub fn ordinal_suffix(day: u8) -> &'static str {
    match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// e.g. "Tuesday, March, 5th".
pub fn date_title(epoch: Epoch) -> String {
    let (_, _, day, ..) = epoch.to_gregorian_utc();
    format!(
        "{}, {}, {day}{}",
        weekday_name(epoch),
        month_name(epoch),
        ordinal_suffix(day)
    )
}
