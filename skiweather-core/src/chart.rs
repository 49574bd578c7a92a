//! Dual-axis forecast chart: temperature lines on the left axis, snow depth bars on the right.

use anyhow::{Result, anyhow, bail};
use plotters::prelude::*;
use std::{fmt::Display, ops::Range, path::Path};
use tracing::info;

use crate::model::ForecastTable;

const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
const NAVY: RGBColor = RGBColor(0, 0, 128);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const SIZE: (u32, u32) = (1000, 600);

/// Render `table` as an SVG chart at `path`.
pub fn render_chart(table: &ForecastTable, path: &Path) -> Result<()> {
    if table.is_empty() {
        bail!("Nothing to plot: the forecast table is empty");
    }

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let dates: Vec<&str> = table.iter().map(|d| d.date.as_str()).collect();
    let x_range = day_axis(table.len());

    let mut chart = ChartBuilder::on(&root)
        .caption("Weather Forecast", ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), temperature_axis(table))
        .map_err(draw_err)?
        .set_secondary_coord(x_range, snow_axis(table));

    let date_label = |x: &f64| label_for(&dates, *x);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(dates.len())
        .x_label_formatter(&date_label)
        .x_desc("Date")
        .y_desc("Temperature (C)")
        .draw()
        .map_err(draw_err)?;

    chart
        .configure_secondary_axes()
        .y_desc("Snow Depth (cm)")
        .draw()
        .map_err(draw_err)?;

    // bars first so the temperature lines stay on top
    chart
        .draw_secondary_series(
            table.iter().enumerate().filter(|(_, day)| day.total_snow_cm.is_finite()).map(|(i, day)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - 0.35, 0.0), (x + 0.35, day.total_snow_cm)],
                    SKY_BLUE.mix(0.5).filled(),
                )
            }),
        )
        .map_err(draw_err)?
        .label("Snow Depth (cm)")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], SKY_BLUE.mix(0.5).filled()));

    let series = [
        ("Max Temp (C)", FIREBRICK, table.iter().map(|d| d.max_temp_c).collect::<Vec<_>>()),
        ("Min Temp (C)", NAVY, table.iter().map(|d| d.min_temp_c).collect::<Vec<_>>()),
    ];
    for (label, color, values) in series {
        chart
            .draw_series(
                LineSeries::new(
                    values
                        .into_iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(i, v)| (i as f64, v)),
                    color.stroke_width(2),
                )
                .point_size(4),
            )
            .map_err(draw_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;

    info!(path = %path.display(), days = table.len(), "rendered forecast chart");
    Ok(())
}

fn draw_err(e: impl Display) -> anyhow::Error {
    anyhow!("Failed to render chart: {e}")
}

/// One slot per day, centred on the day's index.
fn day_axis(days: usize) -> Range<f64> {
    -0.5..(days as f64 - 0.5)
}

fn label_for(dates: &[&str], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    dates.get(idx as usize).map(|d| d.to_string()).unwrap_or_default()
}

fn temperature_axis(table: &ForecastTable) -> Range<f64> {
    let lo = table.iter().map(|d| d.min_temp_c.min(d.max_temp_c)).fold(f64::INFINITY, f64::min);
    let hi = table.iter().map(|d| d.max_temp_c.max(d.min_temp_c)).fold(f64::NEG_INFINITY, f64::max);
    padded(lo, hi)
}

fn snow_axis(table: &ForecastTable) -> Range<f64> {
    let hi = table
        .iter()
        .map(|d| d.total_snow_cm)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    if hi > 0.0 { 0.0..hi * 1.2 } else { 0.0..1.0 }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad)..(hi + pad)
}
