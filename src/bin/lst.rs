//! Print the local sidereal time at a station, once or every second.

use std::{thread::sleep, time::Duration as StdDuration};

use clap::{AppSettings, Parser};
use hifitime::{Duration, Epoch};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use skyplan::{
    lst::{lst_hours, Hms},
    setup_logging,
    site::{Site, I_LOFAR},
    time::{now, parse_observation_start},
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// A built-in observatory. The default is I-LOFAR.
    #[clap(long, conflicts_with = "longitude")]
    site: Option<String>,

    /// An east-positive longitude \[degrees\] to use instead of a site.
    #[clap(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// The UTC time to give the LST for, e.g. "2024-03-05 18:00:00". The
    /// default is now.
    #[clap(short, long)]
    time: Option<String>,

    /// Keep updating the LST every second until interrupted.
    #[clap(short, long)]
    watch: bool,

    /// Stop watching after this many updates.
    #[clap(long, requires = "watch")]
    ticks: Option<u64>,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn lst_line(longitude_deg: f64, epoch: Epoch) -> String {
    format!(
        "Local Sidereal Time (LST): {}",
        Hms::from_hours(lst_hours(longitude_deg, epoch))
    )
}

/// Whether another update is due after `done` of them.
fn more_updates(ticks: Option<u64>, done: u64) -> bool {
    ticks.map_or(true, |n| done < n)
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let longitude_deg = match (args.longitude, args.site.as_deref()) {
        (Some(lon), _) => lon,
        (None, Some(name)) => {
            let site = Site::by_name(name)?;
            debug!("Using {} ({})", site.name, site.description);
            site.longitude_deg()
        }
        (None, None) => I_LOFAR.longitude_deg(),
    };
    info!("Longitude: {longitude_deg}°");

    let fixed_start = args
        .time
        .as_deref()
        .map(parse_observation_start)
        .transpose()?;

    if args.ticks == Some(0) {
        return Err("--ticks must be at least 1".into());
    }
    if !args.watch {
        println!("{}", lst_line(longitude_deg, fixed_start.unwrap_or_else(now)));
        return Ok(());
    }

    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout()).with_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    let mut tick = 0;
    while more_updates(args.ticks, tick) {
        if tick > 0 {
            sleep(StdDuration::from_secs(1));
        }
        // A fixed start time is advanced by one second per update.
        let epoch = match fixed_start {
            Some(start) => start + Duration::from_seconds(tick as f64),
            None => now(),
        };
        spinner.set_message(lst_line(longitude_deg, epoch));
        spinner.tick();
        tick += 1;
    }
    spinner.finish();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_limit() {
        assert!(!more_updates(Some(0), 0));
        assert!(more_updates(Some(2), 1));
        assert!(!more_updates(Some(2), 2));
        assert!(more_updates(None, 1_000_000));
    }

    #[test]
    fn ticks_need_watch() {
        let args = Args::try_parse_from(["lst", "--watch", "--ticks", "2"]).unwrap();
        assert_eq!(args.ticks, Some(2));
        assert!(Args::try_parse_from(["lst", "--ticks", "3"]).is_err());
    }

    #[test]
    fn lst_line_format() {
        let epoch = Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0);
        let line = lst_line(0.0, epoch);
        assert_eq!(line, "Local Sidereal Time (LST): 18:41:50");
    }
}
