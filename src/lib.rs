//! Observation planning for a single LOFAR station: local sidereal time,
//! alt/az tracks, sky-noise-limited sensitivity and a greedy
//! highest-altitude scheduler.

pub mod catalogue;
pub mod coords;
mod error;
pub mod lst;
pub mod plot;
pub mod schedule;
pub mod sensitivity;
pub mod site;
pub mod sun;
pub mod time;
pub mod track;
pub mod tsky;

pub use catalogue::{Catalogue, Source};
pub use error::SkyplanError;
pub use site::Site;
pub use time::TimeGrid;
pub use track::{AltAzTrack, Target};

/// Set up `env_logger` for the binaries. Increase the verbosity by specifying
/// `-v` multiple times; `RUST_LOG` is still honoured.
pub fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();
}
