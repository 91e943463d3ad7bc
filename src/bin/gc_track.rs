//! The Galactic Centre's altitude over the next day, coloured by azimuth.

use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::info;

use skyplan::{
    catalogue::benchmark,
    plot::colored_track_plot,
    setup_logging,
    site::Site,
    time::{hhmm, now, parse_observation_start},
    AltAzTrack, Target, TimeGrid,
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// When to start (UTC), e.g. "2024-03-05 18:00:00". The default is now.
    #[clap(short, long)]
    start: Option<String>,

    #[clap(long, default_value = "24")]
    hours: f64,

    #[clap(long, default_value = "100")]
    samples: usize,

    /// The observatory.
    #[clap(long, default_value = "I-LOFAR")]
    site: String,

    /// Where the plot is written.
    #[clap(short, long, default_value = "plots")]
    output_dir: PathBuf,

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

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let site = Site::by_name(&args.site)?;
    let start = match args.start.as_deref() {
        Some(s) => parse_observation_start(s)?,
        None => now(),
    };
    let grid = TimeGrid::linspace(start, args.hours, args.samples)?;

    let gc = Target::Fixed(benchmark("Galactic Centre")?.clone());
    let track = AltAzTrack::compute(&gc, &site, &grid);
    if let Some((i, alt)) = track.peak() {
        info!(
            "The Galactic Centre peaks at {alt:.2}° at {}",
            hhmm(grid.epochs()[i])
        );
    }

    let (_, month, day, ..) = start.to_gregorian_utc();
    colored_track_plot(
        &args.output_dir.join("galactic-centre-track.svg"),
        &format!(
            "Galactic Center for next day starting at {}, {month:02}-{day:02}",
            hhmm(start)
        ),
        &grid,
        &track,
    )?;

    Ok(())
}
