//! SVG plots of tracks, schedules and sensitivities.

use std::{fs, path::Path};

use hifitime::Duration;
use log::info;
use plotters::prelude::*;

use crate::{
    sensitivity::SensitivityCurve,
    time::{hhmm, TimeGrid},
    track::AltAzTrack,
};

type PlotResult = Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";

/// Colours for successive curves when the caller doesn't pick one.
const CURVE_COLOURS: [RGBColor; 7] = [RED, BLUE, GREEN, RGBColor(200, 170, 0), MAGENTA, CYAN, BLACK];

pub fn curve_colour(i: usize) -> RGBColor {
    CURVE_COLOURS[i % CURVE_COLOURS.len()]
}

fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// The smallest and largest finite values, padded. Falls back to `fallback`
/// when there's nothing finite.
fn padded_range<I: IntoIterator<Item = f64>>(values: I, pad: f64, fallback: (f64, f64)) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return fallback;
    }
    if min == max {
        return (min - pad.max(1.0), max + pad.max(1.0));
    }
    (min - pad, max + pad)
}

/// One target on a [`sky_plot`].
pub struct SkySeries<'a> {
    pub label: String,
    pub track: &'a AltAzTrack,
    pub colour: RGBColor,
    pub marker_size: i32,
}

/// Project horizon coordinates onto the sky chart: zenith at the centre, the
/// horizon at radius 90, north up and east to the left.
fn sky_xy(alt_deg: f64, az_deg: f64) -> Option<(f64, f64)> {
    if !(0.0..=90.0).contains(&alt_deg) {
        return None;
    }
    let r = 90.0 - alt_deg;
    let (sin_az, cos_az) = az_deg.to_radians().sin_cos();
    Some((-r * sin_az, r * cos_az))
}

/// Only the parts of each track above the horizon are drawn.
pub fn sky_plot(path: &Path, title: &str, series: &[SkySeries]) -> PlotResult {
    create_parent_dir(path)?;
    let root = SVGBackend::new(path, (900, 860)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24).into_font())
        .margin(20)
        .build_cartesian_2d(-100.0..100.0, -100.0..100.0)?;

    for alt in [0.0, 30.0, 60.0] {
        let r = 90.0 - alt;
        chart.draw_series(LineSeries::new(
            (0..=360).map(|d| {
                let (s, c) = f64::from(d).to_radians().sin_cos();
                (r * c, r * s)
            }),
            BLACK.mix(0.3).stroke_width(1),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{alt}°"),
            (1.0, r - 1.0),
            (FONT, 12).into_font(),
        )))?;
    }
    for (label, az) in [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)] {
        let (sin_az, cos_az) = f64::to_radians(az).sin_cos();
        chart.draw_series(std::iter::once(Text::new(
            label.to_string(),
            (-96.0 * sin_az - 2.0, 96.0 * cos_az + 2.0),
            (FONT, 18).into_font(),
        )))?;
    }

    for s in series {
        let colour = s.colour;
        let size = s.marker_size;
        let points: Vec<(f64, f64)> = s
            .track
            .alt_deg
            .iter()
            .zip(&s.track.az_deg)
            .filter_map(|(&alt, &az)| sky_xy(alt, az))
            .collect();
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(move |p| Circle::new(p, size, colour.filled())),
            )?
            .label(s.label.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, colour.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Azimuth (top) and altitude (bottom) against time, with a horizon line on
/// the altitude panel.
pub fn elevation_plot(
    path: &Path,
    title: &str,
    grid: &TimeGrid,
    track: &AltAzTrack,
    horizon_deg: f64,
) -> PlotResult {
    create_parent_dir(path)?;
    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, (FONT, 26).into_font())?;
    let (upper, lower) = root.split_vertically(360);

    let hours = grid.hours_since_start();
    let x_max = hours.last().copied().unwrap_or(0.0).max(1e-3);
    let start = grid.first();
    let time_label = |h: &f64| hhmm(start + Duration::from_seconds(h * 3600.0));

    let mut az_chart = ChartBuilder::on(&upper)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..360.0)?;
    az_chart
        .configure_mesh()
        .y_desc("Azimuth (deg)")
        .x_label_formatter(&time_label)
        .draw()?;
    az_chart
        .draw_series(LineSeries::new(
            hours.iter().copied().zip(track.az_deg.iter().copied()),
            BLUE.stroke_width(2),
        ))?
        .label("Azimuth")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
    az_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    let (y_min, y_max) = padded_range(
        track.alt_deg.iter().copied().chain(std::iter::once(horizon_deg)),
        5.0,
        (-90.0, 90.0),
    );
    let mut alt_chart = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min.max(-90.0)..y_max.min(90.0))?;
    alt_chart
        .configure_mesh()
        .x_desc("Time (UTC)")
        .y_desc("Altitude (deg)")
        .x_label_formatter(&time_label)
        .draw()?;
    alt_chart
        .draw_series(LineSeries::new(
            hours.iter().copied().zip(track.alt_deg.iter().copied()),
            BLUE.stroke_width(2),
        ))?
        .label("Altitude")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
    alt_chart
        .draw_series(LineSeries::new(
            vec![(0.0, horizon_deg), (x_max, horizon_deg)],
            RED.stroke_width(1),
        ))?
        .label("Horizon")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(1)));
    alt_chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn sensitivity_plot(path: &Path, target_name: &str, curve: &SensitivityCurve) -> PlotResult {
    create_parent_dir(path)?;
    let root = SVGBackend::new(path, (900, 450)).into_drawing_area();
    root.fill(&WHITE)?;

    let sens_mjy = curve.sens_mjy();
    let (x_min, x_max) = padded_range(curve.freqs_mhz.iter().copied(), 5.0, (100.0, 190.0));
    let (_, y_max) = padded_range(sens_mjy.iter().copied(), 0.0, (0.0, 1.0));
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Sensitivity limit for {target_name}"),
            (FONT, 20).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("Frequency (MHz)")
        .y_desc("Sensitivity Limit (mJy)")
        .draw()?;

    let points: Vec<(f64, f64)> = curve
        .freqs_mhz
        .iter()
        .copied()
        .zip(sens_mjy.iter().copied())
        .collect();
    chart.draw_series(LineSeries::new(points.clone(), BLUE.stroke_width(2)))?;
    chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, BLUE.filled())))?;

    if let Some(min) = curve.min_mjy() {
        chart
            .draw_series(LineSeries::new(
                vec![(x_min, min), (x_max, min)],
                RED.stroke_width(1),
            ))?
            .label(format!("Min Sensitivity ({min:.2} mJy)"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(1)));
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// A labelled curve, for plots with several.
pub struct Curve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

pub fn galactic_sensitivity_plot(path: &Path, curves: &[Curve]) -> PlotResult {
    create_parent_dir(path)?;
    let root = SVGBackend::new(path, (750, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = padded_range(
        curves.iter().flat_map(|c| c.y.iter().copied()),
        1.0,
        (0.0, 1.0),
    );
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..75.0, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Galactic Latitude (deg)")
        .y_desc("Sensitivity Limit (mJy)")
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let colour = curve_colour(i);
        chart
            .draw_series(LineSeries::new(
                curve.x.iter().copied().zip(curve.y.iter().copied()),
                colour.stroke_width(2),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Altitude against time, with each segment coloured by azimuth (blue for the
/// smallest azimuth through to red for the largest).
pub fn colored_track_plot(path: &Path, title: &str, grid: &TimeGrid, track: &AltAzTrack) -> PlotResult {
    create_parent_dir(path)?;
    let root = SVGBackend::new(path, (1500, 900)).into_drawing_area();
    root.fill(&WHITE)?;

    let hours = grid.hours_since_start();
    let x_max = hours.last().copied().unwrap_or(0.0).max(1e-3);
    let start = grid.first();
    let time_label = |h: &f64| hhmm(start + Duration::from_seconds(h * 3600.0));
    let (y_min, y_max) = padded_range(track.alt_deg.iter().copied(), 5.0, (-90.0, 90.0));
    let (az_min, az_max) = padded_range(track.az_deg.iter().copied(), 0.0, (0.0, 360.0));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{title} (colour: azimuth {az_min:.0}° blue to {az_max:.0}° red)"),
            (FONT, 22).into_font(),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Time (UTC)")
        .y_desc("Altitude (degrees)")
        .x_label_formatter(&time_label)
        .draw()?;

    let span = (az_max - az_min).max(f64::EPSILON);
    for (i, pair) in track.alt_deg.windows(2).enumerate() {
        let az = track.az_deg[i];
        // Hue 2/3 is blue, 0 is red.
        let hue = (1.0 - ((az - az_min) / span).clamp(0.0, 1.0)) * 2.0 / 3.0;
        chart.draw_series(LineSeries::new(
            vec![(hours[i], pair[0]), (hours[i + 1], pair[1])],
            HSLColor(hue, 0.8, 0.45).stroke_width(3),
        ))?;
    }

    root.present()?;
    info!("Wrote {}", path.display());
    Ok(())
}
