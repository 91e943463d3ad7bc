use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::{debug, info};
use plotters::style::{RGBColor, BLACK, BLUE, RED};

use skyplan::{
    catalogue::benchmarks,
    plot::{curve_colour, sky_plot, SkySeries},
    schedule::schedule_catalogue,
    setup_logging,
    site::Site,
    time::{now, parse_observation_start, schedule_timefmt},
    track::compute_tracks,
    AltAzTrack, Catalogue, Target, TimeGrid,
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// A CSV catalogue with Name, RA and DEC columns (J2000, radians).
    catalogue: PathBuf,

    /// When to start observing (UTC), e.g. "2024-03-05 18:00:00". The default
    /// is now.
    #[clap(short, long)]
    start: Option<String>,

    /// How long the schedule covers.
    #[clap(long, default_value = "31")]
    window_hours: f64,

    /// The number of time samples across the window.
    #[clap(long, default_value = "1000")]
    samples: usize,

    /// The observatory.
    #[clap(long, default_value = "I-LOFAR")]
    site: String,

    /// Observe from this east-positive longitude \[degrees\] instead of a
    /// built-in site.
    #[clap(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    #[clap(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Also draw the benchmark targets and the scheduled sources on a sky
    /// plot in this directory.
    #[clap(long)]
    plot_dir: Option<PathBuf>,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Disable progress bars.
    #[clap(long)]
    no_progress_bars: bool,
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

    let site = match (args.longitude, args.latitude) {
        (Some(lon), Some(lat)) => Site::custom(lon, lat, 0.0),
        _ => Site::by_name(&args.site)?,
    };
    info!("Observing from {} ({})", site.name, site.description);

    let start = match args.start.as_deref() {
        Some(s) => parse_observation_start(s)?,
        None => now(),
    };
    let grid = TimeGrid::linspace(start, args.window_hours, args.samples)?;
    info!(
        "Scheduling {} samples from {} to {}",
        grid.len(),
        schedule_timefmt(grid.first()),
        schedule_timefmt(grid.last())
    );

    let catalogue = Catalogue::from_csv(&args.catalogue)?;
    info!("Read {} sources", catalogue.len());

    let tracks = compute_tracks(&catalogue, &site, &grid, !args.no_progress_bars);
    let schedule = schedule_catalogue(&catalogue, &tracks, &grid)?;
    debug!("{} intervals", schedule.len());

    for interval in &schedule {
        let source = &catalogue.sources()[interval.owner];
        println!("{}", interval.format_line(source));
    }

    if let Some(plot_dir) = args.plot_dir {
        let benchmark_tracks: Vec<(String, AltAzTrack, RGBColor)> = benchmarks()
            .iter()
            .map(|s| Target::Fixed(s.clone()))
            .chain(std::iter::once(Target::Sun))
            .zip([BLACK, RED, BLUE, RGBColor(230, 160, 0)])
            .map(|(target, colour)| {
                (
                    target.name().to_string(),
                    AltAzTrack::compute(&target, &site, &grid),
                    colour,
                )
            })
            .collect();

        // Only draw the scheduled parts of each scheduled source's track.
        let mut scheduled_tracks: Vec<(String, AltAzTrack)> = vec![];
        for interval in &schedule {
            let track = &tracks[interval.owner];
            let range = interval.start_index..interval.end_index;
            let segment = AltAzTrack {
                alt_deg: track.alt_deg[range.clone()].to_vec(),
                az_deg: track.az_deg[range].to_vec(),
            };
            match scheduled_tracks.iter_mut().find(|(name, _)| *name == interval.name) {
                Some((_, existing)) => {
                    existing.alt_deg.extend(segment.alt_deg);
                    existing.az_deg.extend(segment.az_deg);
                }
                None => scheduled_tracks.push((interval.name.clone(), segment)),
            }
        }

        let mut series: Vec<SkySeries> = benchmark_tracks
            .iter()
            .map(|(label, track, colour)| SkySeries {
                label: label.clone(),
                track,
                colour: *colour,
                marker_size: 2,
            })
            .collect();
        series.extend(
            scheduled_tracks
                .iter()
                .enumerate()
                .map(|(i, (label, track))| SkySeries {
                    label: label.clone(),
                    track,
                    colour: curve_colour(i + 1),
                    marker_size: 3,
                }),
        );

        let path = plot_dir.join("schedule-sky-plot.svg");
        sky_plot(
            &path,
            &format!(
                "Schedule from {} starting {}",
                site.name,
                schedule_timefmt(grid.first())
            ),
            &series,
        )?;
    }

    Ok(())
}
