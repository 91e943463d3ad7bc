//! Elevation and sky plots for one target over an observing window, and its
//! sky-noise-limited sensitivity.

use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::{debug, info, warn};
use plotters::style::{RGBColor, BLACK, BLUE, RED};

use skyplan::{
    catalogue::{benchmark, CatalogueError},
    coords::{interpret_dec, interpret_ra, AngleUnit},
    plot::{elevation_plot, sensitivity_plot, sky_plot, SkySeries},
    sensitivity::{ObservationSetup, SensitivityCurve},
    setup_logging,
    site::Site,
    time::{date_title, month_name, parse_observation_start, schedule_timefmt},
    track::{horizon_crossings, CrossingKind},
    tsky::{SkyTemperature, TskyCommand, DEFAULT_SCRIPT},
    AltAzTrack, Catalogue, Source, Target, TimeGrid,
};

/// The altitude the station can't usefully see below.
const HORIZON_DEG: f64 = -11.0;

const SUN_COLOUR: RGBColor = RGBColor(230, 160, 0);

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// The name of the target. Multiple words are joined with spaces.
    #[clap(long, required = true, multiple_values(true))]
    name: Vec<String>,

    /// The start of the observation (UTC), e.g. 2024-03-05 18:00:00.
    #[clap(long, required = true, multiple_values(true))]
    date: Vec<String>,

    /// The target's right ascension (J2000). Values above 2π are taken to be
    /// degrees, otherwise radians.
    #[clap(long, allow_hyphen_values = true)]
    ra: Option<f64>,

    /// The target's declination (J2000). Values beyond ±π/2 are taken to be
    /// degrees, otherwise radians.
    #[clap(long, allow_hyphen_values = true)]
    dec: Option<f64>,

    /// A CSV catalogue to look the target up in when no coordinates are given.
    #[clap(long)]
    catalogue: Option<PathBuf>,

    /// The observatory.
    #[clap(long, default_value = "I-LOFAR")]
    site: String,

    #[clap(long, default_value = "31")]
    window_hours: f64,

    #[clap(long, default_value = "1000")]
    samples: usize,

    /// Where the plots are written.
    #[clap(short, long, default_value = "elevation-plots")]
    output_dir: PathBuf,

    /// The sky temperature script.
    #[clap(long, default_value = DEFAULT_SCRIPT)]
    tsky_script: PathBuf,

    /// The interpreter for the sky temperature script.
    #[clap(long, default_value = "python")]
    python: String,

    /// The frequencies \[MHz\] to estimate the sensitivity at.
    #[clap(long, multiple_values(true), default_values = &["100", "110", "120", "130", "140", "150", "160", "170", "180", "190"])]
    freqs: Vec<f64>,

    /// Don't estimate the sensitivity (and don't run the sky temperature
    /// script).
    #[clap(long)]
    no_sensitivity: bool,

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

fn resolve_target(args: &Args, name: &str) -> Result<Target, CatalogueError> {
    match (args.ra, args.dec) {
        (Some(ra), Some(dec)) => {
            let (ra, ra_unit) = interpret_ra(ra);
            let (dec, dec_unit) = interpret_dec(dec);
            for (what, unit) in [("RA", ra_unit), ("Dec", dec_unit)] {
                match unit {
                    AngleUnit::Degrees => info!("{what} given in degrees"),
                    AngleUnit::Radians => info!("{what} given in radians"),
                }
            }
            return Ok(Target::Fixed(Source {
                name: name.to_string(),
                radec: marlu::RADec { ra, dec },
            }));
        }
        (None, None) => (),
        _ => warn!("Both --ra and --dec are needed; looking '{name}' up instead"),
    }

    if name.eq_ignore_ascii_case("Sun") {
        info!("Sun selected, no need for RA and Dec");
        return Ok(Target::Sun);
    }
    if let Ok(source) = benchmark(name) {
        debug!("'{name}' is a built-in target");
        return Ok(Target::Fixed(source.clone()));
    }
    match &args.catalogue {
        Some(path) => {
            let catalogue = Catalogue::from_csv(path)?;
            let (_, source) = catalogue.lookup(name)?;
            Ok(Target::Fixed(source.clone()))
        }
        None => Err(CatalogueError::NotFound(name.to_string())),
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.verbosity);

    let name = args.name.join(" ");
    let start = parse_observation_start(&args.date.join(" "))?;
    let site = Site::by_name(&args.site)?;
    let target = resolve_target(&args, &name)?;
    let start_radec = target.radec_at(start);
    info!(
        "{name}: RA {:.4}°, Dec {:.4}°",
        start_radec.ra.to_degrees(),
        start_radec.dec.to_degrees()
    );

    let grid = TimeGrid::linspace(start, args.window_hours, args.samples)?;
    info!("Observation start time: {}", schedule_timefmt(start));
    info!("Observation window: {} hours", args.window_hours);
    debug!(
        "Time increment: {} minutes",
        args.window_hours * 60.0 / (grid.len().max(2) - 1) as f64
    );

    let track = AltAzTrack::compute(&target, &site, &grid);
    match track.peak() {
        Some((i, alt)) => info!(
            "Highest altitude {alt:.2}° at {}",
            schedule_timefmt(grid.epochs()[i])
        ),
        None => warn!("No usable altitudes for {name}"),
    }
    let crossings = horizon_crossings(&track, &grid, HORIZON_DEG);
    if crossings.is_empty() {
        info!("{name} doesn't cross the {HORIZON_DEG}° horizon in this window");
    }
    for c in &crossings {
        let verb = match c.kind {
            CrossingKind::Rising => "rises above",
            CrossingKind::Setting => "sets below",
        };
        info!("{name} {verb} {HORIZON_DEG}° at {}", schedule_timefmt(c.epoch));
    }

    // Polaris is only drawn at the start; it hardly moves.
    let start_only = TimeGrid::from_epochs(vec![start])?;
    let mut benchmark_tracks: Vec<(String, AltAzTrack, RGBColor)> = vec![];
    for (bench, colour, grid) in [("Polaris", BLACK, &start_only), ("Crab", RED, &grid)] {
        let bench = Target::Fixed(benchmark(bench)?.clone());
        benchmark_tracks.push((
            bench.name().to_string(),
            AltAzTrack::compute(&bench, &site, grid),
            colour,
        ));
    }
    if !matches!(target, Target::Sun) {
        benchmark_tracks.push((
            "Sun".to_string(),
            AltAzTrack::compute(&Target::Sun, &site, &grid),
            SUN_COLOUR,
        ));
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
    series.push(SkySeries {
        label: name.clone(),
        track: &track,
        colour: if matches!(target, Target::Sun) {
            SUN_COLOUR
        } else {
            BLUE
        },
        marker_size: 2,
    });

    let (_, _, day, ..) = start.to_gregorian_utc();
    sky_plot(
        &args.output_dir.join(format!("{name}-sky-plot.svg")),
        &format!("{name} from {}", site.name),
        &series,
    )?;
    elevation_plot(
        &args
            .output_dir
            .join(format!("{name}-elevation-plot-{day}{}.svg", month_name(start))),
        &format!(
            "{name} observation from {} starting {}",
            site.name,
            date_title(start)
        ),
        &grid,
        &track,
        HORIZON_DEG,
    )?;

    if args.no_sensitivity {
        return Ok(());
    }

    let tsky = TskyCommand::new(&args.python, &args.tsky_script);
    let rows = tsky.sky_temperatures(start_radec, Some(args.freqs.as_slice()))?;
    for row in &rows {
        debug!(
            "{} MHz: T_conv {} K, T_raw {} K, T_diff {} K",
            row.freq_mhz, row.conv_temp_k, row.raw_temp_k, row.diff_temp_k
        );
    }
    let curve = SensitivityCurve::from_sky_temps(&rows, &ObservationSetup::SINGLE_TARGET);
    if let Some(min) = curve.min_mjy() {
        println!("Sensitivity Limit (mJy): {min}");
    }
    sensitivity_plot(
        &args.output_dir.join(format!("{name}-sensitivity-plot.svg")),
        &name,
        &curve,
    )?;

    Ok(())
}
