use chrono::Local;
use skiweather_core::{DayRecord, ForecastTable};

/// Plain-text table for the terminal; absent aggregates print as `-`.
pub fn render(location: &str, table: &ForecastTable) -> String {
    let mut out = format!(
        "Forecast for {location} ({} days, fetched {})\n",
        table.len(),
        Local::now().format("%Y-%m-%d %H:%M")
    );
    out.push_str(&format!(
        "{:<12} {:>9} {:>9} {:>9} {:>10} {:>11}\n",
        "date", "max °C", "min °C", "snow cm", "snow %", "visib. km"
    ));
    for day in table {
        out.push_str(&row(day));
    }
    out
}

fn row(day: &DayRecord) -> String {
    format!(
        "{:<12} {:>9.1} {:>9.1} {:>9.1} {:>10} {:>11}\n",
        day.date,
        day.max_temp_c,
        day.min_temp_c,
        day.total_snow_cm,
        optional(day.chance_of_snow),
        optional(day.avg_visibility_km),
    )
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}
