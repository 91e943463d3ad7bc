//! Sensitivity against galactic latitude for a handful of sweeps away from the
//! galactic plane.

use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::{debug, info, warn};

use skyplan::{
    plot::{galactic_sensitivity_plot, Curve},
    sensitivity::{galactic_sweep, smooth, ObservationSetup},
    setup_logging,
    tsky::{TskyCommand, DEFAULT_SCRIPT},
};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// The final galactic longitude \[degrees\] of each sweep. One curve is
    /// drawn per value.
    #[clap(long, multiple_values(true), default_values = &["0", "60", "120", "180", "240", "300"])]
    longitudes: Vec<f64>,

    /// Pointings per sweep.
    #[clap(long, default_value = "20")]
    points: usize,

    /// The station's effective area \[m²\].
    #[clap(long, default_value = "2048")]
    aeff: f64,

    /// The sky temperature script.
    #[clap(long, default_value = DEFAULT_SCRIPT)]
    tsky_script: PathBuf,

    /// The interpreter for the sky temperature script.
    #[clap(long, default_value = "python")]
    python: String,

    /// Where the plot is written.
    #[clap(short, long, default_value = "plots")]
    output_dir: PathBuf,

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

    let tsky = TskyCommand::new(&args.python, &args.tsky_script);
    let setup = ObservationSetup::GALACTIC_SWEEP;
    debug!("{setup:?}, A_eff = {} m²", args.aeff);

    let mut curves = vec![];
    for &longitude in &args.longitudes {
        info!("Sweeping to l = {longitude}");
        let pointings = galactic_sweep(
            &tsky,
            longitude,
            args.points,
            &setup,
            args.aeff,
            !args.no_progress_bars,
        );
        let latitudes: Vec<f64> = pointings.iter().map(|p| p.b_deg).collect();
        let sens_mjy: Vec<f64> = pointings.iter().map(|p| p.sens_jy * 1000.0).collect();
        for p in &pointings {
            println!(
                "l = {:6.2}  b = {:5.2}  T_conv = {:8.2} K  S_min = {:.4} mJy",
                p.l_deg,
                p.b_deg,
                p.mean_conv_temp_k,
                p.sens_jy * 1000.0
            );
        }

        match smooth(&latitudes, &sens_mjy) {
            Ok((x, y)) => curves.push(Curve {
                label: format!("l = {longitude}"),
                x,
                y,
            }),
            Err(e) => warn!("Not plotting l = {longitude}: {e}"),
        }
    }

    if curves.is_empty() {
        warn!("Nothing to plot");
        return Ok(());
    }
    galactic_sensitivity_plot(&args.output_dir.join("galactic-sensitivity.svg"), &curves)?;

    Ok(())
}
