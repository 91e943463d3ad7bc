//! Greedy highest-altitude scheduling.
//!
//! At every time sample the candidate with the highest altitude "owns" that
//! sample; consecutive samples with the same owner are merged into an
//! [`Interval`]. There's no notion of slewing, dwell times or priorities.

use std::cmp::Ordering;

use hifitime::Epoch;
use itertools::Itertools;
use log::debug;
use thiserror::Error;
use vec1::Vec1;

use crate::{
    catalogue::{Catalogue, Source},
    time::{schedule_timefmt, TimeGrid},
    track::AltAzTrack,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Can't schedule without any candidate sources")]
    NoCandidates,

    #[error("Altitudes for '{name}' have {got} samples, but the time grid has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("The catalogue has {sources} sources but {tracks} tracks were given")]
    TrackCount { sources: usize, tracks: usize },
}

/// A source competing for time, with its altitudes \[degrees\] on the shared
/// time grid.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub altitudes: &'a [f64],
}

/// A contiguous run of samples owned by one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// The index of the owner in the candidate list (which is also the
    /// catalogue index when scheduling a catalogue).
    pub owner: usize,
    pub name: String,

    /// The first sample of the interval.
    pub start_index: usize,

    /// One past the last sample of the interval.
    pub end_index: usize,

    pub start: Epoch,

    /// The time of the first sample of the next interval, or of the final
    /// sample of the grid for the last interval.
    pub end: Epoch,
}

impl Interval {
    pub fn num_samples(&self) -> usize {
        self.end_index - self.start_index
    }

    /// e.g. `2024-03-05T18:00 - 2024-03-05T21:27 : B0329+54 [0.9259, 0.9525, 'J2000']`
    pub fn format_line(&self, source: &Source) -> String {
        format!(
            "{} - {} : {} [{}, {}, 'J2000']",
            schedule_timefmt(self.start),
            schedule_timefmt(self.end),
            self.name,
            source.radec.ra,
            source.radec.dec
        )
    }
}

/// NaN never beats a real altitude.
fn altitude_key(alt: f64) -> f64 {
    if alt.is_nan() {
        f64::NEG_INFINITY
    } else {
        alt
    }
}

/// The candidate that owns sample `i`. Equal altitudes go to the
/// lexicographically smallest name, then to the earliest candidate.
/// `candidates` must not be empty.
fn owner_at(candidates: &[Candidate], i: usize) -> usize {
    (1..candidates.len()).fold(0, |best, c| {
        let (challenger, holder) = (&candidates[c], &candidates[best]);
        let order = altitude_key(challenger.altitudes[i])
            .total_cmp(&altitude_key(holder.altitudes[i]))
            .then_with(|| holder.name.cmp(challenger.name));
        if order == Ordering::Greater {
            c
        } else {
            best
        }
    })
}

pub fn greedy_schedule(
    candidates: &[Candidate],
    grid: &TimeGrid,
) -> Result<Vec1<Interval>, ScheduleError> {
    if candidates.is_empty() {
        return Err(ScheduleError::NoCandidates);
    }
    for c in candidates {
        if c.altitudes.len() != grid.len() {
            return Err(ScheduleError::LengthMismatch {
                name: c.name.to_string(),
                expected: grid.len(),
                got: c.altitudes.len(),
            });
        }
    }

    let new_interval = |owner: usize, start_index: usize, end_index: usize| Interval {
        owner,
        name: candidates[owner].name.to_string(),
        start_index,
        end_index,
        start: grid.epochs()[start_index],
        end: grid.get(end_index).unwrap_or_else(|| grid.last()),
    };

    // The grid always has a first sample, and so a first interval.
    let mut intervals = Vec1::new(new_interval(owner_at(candidates, 0), 0, 1));
    for (count, owner) in (1..grid.len())
        .map(|i| owner_at(candidates, i))
        .dedup_with_count()
    {
        let last = intervals.last_mut();
        if last.owner == owner {
            *last = new_interval(owner, last.start_index, last.end_index + count);
        } else {
            let start_index = last.end_index;
            intervals.push(new_interval(owner, start_index, start_index + count));
        }
    }
    debug!(
        "{} candidates over {} samples gave {} intervals",
        candidates.len(),
        grid.len(),
        intervals.len()
    );

    Ok(intervals)
}

/// Schedule a whole catalogue from its precomputed tracks (in catalogue
/// order).
pub fn schedule_catalogue(
    catalogue: &Catalogue,
    tracks: &[AltAzTrack],
    grid: &TimeGrid,
) -> Result<Vec1<Interval>, ScheduleError> {
    if catalogue.len() != tracks.len() {
        return Err(ScheduleError::TrackCount {
            sources: catalogue.len(),
            tracks: tracks.len(),
        });
    }
    let candidates: Vec<Candidate> = catalogue
        .sources()
        .iter()
        .zip(tracks)
        .map(|(source, track)| Candidate {
            name: &source.name,
            altitudes: &track.alt_deg,
        })
        .collect();
    greedy_schedule(&candidates, grid)
}

/// Compare two altitudes the way the scheduler does; exposed so callers can
/// verify a schedule.
pub fn compare_altitudes(a: f64, b: f64) -> Ordering {
    altitude_key(a).total_cmp(&altitude_key(b))
}

#[cfg(test)]
mod tests {
    use hifitime::Duration;

    use super::*;

    fn grid(n: usize) -> TimeGrid {
        TimeGrid::linspace(
            Epoch::from_gregorian_utc_hms(2024, 3, 5, 18, 0, 0),
            (n - 1) as f64,
            n,
        )
        .unwrap()
    }

    #[test]
    fn single_source_owns_everything() {
        let alts: Vec<f64> = (0..50).map(|i| -20.0 + i as f64).collect();
        let grid = grid(50);
        let schedule = greedy_schedule(
            &[Candidate {
                name: "only",
                altitudes: &alts,
            }],
            &grid,
        )
        .unwrap();
        assert_eq!(schedule.len(), 1);
        let only = schedule.first();
        assert_eq!(only.owner, 0);
        assert_eq!((only.start_index, only.end_index), (0, 50));
        assert_eq!(only.start, grid.first());
        assert_eq!(only.end, grid.last());
    }

    #[test]
    fn one_crossing_gives_two_intervals() {
        let rising: Vec<f64> = (0..5).map(|i| 10.0 * i as f64).collect();
        let setting: Vec<f64> = (0..5).map(|i| 45.0 - 10.0 * i as f64).collect();
        let grid = grid(5);
        let schedule = greedy_schedule(
            &[
                Candidate {
                    name: "rising",
                    altitudes: &rising,
                },
                Candidate {
                    name: "setting",
                    altitudes: &setting,
                },
            ],
            &grid,
        )
        .unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].name, "setting");
        assert_eq!((schedule[0].start_index, schedule[0].end_index), (0, 3));
        assert_eq!(schedule[1].name, "rising");
        assert_eq!((schedule[1].start_index, schedule[1].end_index), (3, 5));
        // The first interval ends where the second begins.
        assert_eq!(schedule[0].end, grid.epochs()[3]);
        assert_eq!(schedule[1].start, grid.epochs()[3]);
        assert_eq!(schedule[1].end, grid.last());
        assert_eq!(schedule[1].end - grid.first(), Duration::from_seconds(4.0 * 3600.0));
    }

    #[test]
    fn ties_go_to_the_smallest_name() {
        let alts = vec![10.0; 4];
        let grid = grid(4);
        let schedule = greedy_schedule(
            &[
                Candidate {
                    name: "Zeta",
                    altitudes: &alts,
                },
                Candidate {
                    name: "Alpha",
                    altitudes: &alts,
                },
                Candidate {
                    name: "Alpha",
                    altitudes: &alts,
                },
            ],
            &grid,
        )
        .unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].owner, 1);
        assert_eq!(schedule[0].name, "Alpha");
    }

    #[test]
    fn nans_never_win() {
        let nans = vec![f64::NAN; 3];
        let low = vec![-80.0; 3];
        let grid = grid(3);
        let schedule = greedy_schedule(
            &[
                Candidate {
                    name: "A",
                    altitudes: &nans,
                },
                Candidate {
                    name: "B",
                    altitudes: &low,
                },
            ],
            &grid,
        )
        .unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].name, "B");
    }

    #[test]
    fn below_the_horizon_still_counts() {
        let a = vec![-5.0, -30.0];
        let b = vec![-10.0, -20.0];
        let schedule = greedy_schedule(
            &[
                Candidate {
                    name: "a",
                    altitudes: &a,
                },
                Candidate {
                    name: "b",
                    altitudes: &b,
                },
            ],
            &grid(2),
        )
        .unwrap();
        let names: Vec<&str> = schedule.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn bad_inputs() {
        let grid = grid(3);
        assert_eq!(
            greedy_schedule(&[], &grid).unwrap_err(),
            ScheduleError::NoCandidates
        );
        let short = vec![1.0; 2];
        assert_eq!(
            greedy_schedule(
                &[Candidate {
                    name: "short",
                    altitudes: &short
                }],
                &grid
            )
            .unwrap_err(),
            ScheduleError::LengthMismatch {
                name: "short".to_string(),
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn catalogue_and_tracks_must_agree() {
        let catalogue = Catalogue::new(vec1::vec1![
            crate::catalogue::benchmark("Crab").unwrap().clone(),
            crate::catalogue::benchmark("Polaris").unwrap().clone(),
        ]);
        let grid = grid(3);
        let tracks = vec![AltAzTrack {
            alt_deg: vec![1.0; 3],
            az_deg: vec![0.0; 3],
        }];
        assert_eq!(
            schedule_catalogue(&catalogue, &tracks, &grid).unwrap_err(),
            ScheduleError::TrackCount {
                sources: 2,
                tracks: 1
            }
        );
    }

    #[test]
    fn first_sample_run_is_extended() {
        // The first owner keeps the lead for three samples, then loses it and
        // wins it back.
        let a = vec![10.0, 10.0, 10.0, 0.0, 10.0];
        let b = vec![5.0, 5.0, 5.0, 5.0, 5.0];
        let grid = grid(5);
        let schedule = greedy_schedule(
            &[
                Candidate {
                    name: "a",
                    altitudes: &a,
                },
                Candidate {
                    name: "b",
                    altitudes: &b,
                },
            ],
            &grid,
        )
        .unwrap();
        let runs: Vec<(&str, usize, usize)> = schedule
            .iter()
            .map(|i| (i.name.as_str(), i.start_index, i.end_index))
            .collect();
        assert_eq!(runs, [("a", 0, 3), ("b", 3, 4), ("a", 4, 5)]);
        assert_eq!(schedule[0].end, grid.epochs()[3]);
        assert_eq!(schedule[2].end, grid.last());
    }

    #[test]
    fn schedule_lines() {
        let grid = grid(3);
        let interval = Interval {
            owner: 0,
            name: "B0329+54".to_string(),
            start_index: 0,
            end_index: 3,
            start: grid.first(),
            end: grid.last(),
        };
        let source = Source {
            name: "B0329+54".to_string(),
            radec: marlu::RADec {
                ra: 0.9259,
                dec: 0.9525,
            },
        };
        assert_eq!(interval.num_samples(), 3);
        assert_eq!(
            interval.format_line(&source),
            "2024-03-05T18:00 - 2024-03-05T20:00 : B0329+54 [0.9259, 0.9525, 'J2000']"
        );
    }
}
