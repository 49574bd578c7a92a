//! Flattening of the service's day → hour hierarchy into one record per day.
//!
//! Required daily scalars must parse as numbers or the whole call fails.
//! Hourly samples are optional: anything that does not parse is skipped, and a
//! day without usable samples gets an absent mean rather than zero.

use serde_json::Value;
use tracing::debug;

use crate::{
    error::ForecastError,
    model::{DayRecord, ForecastTable, RawDay, RawForecastResponse},
};

/// Flatten a successful response into a [`ForecastTable`].
///
/// Error-shaped responses are expected to have been rejected by the provider already;
/// a body without a `weather` list is reported as malformed data.
pub fn flatten(response: &RawForecastResponse) -> Result<ForecastTable, ForecastError> {
    let days = response
        .data
        .weather
        .as_deref()
        .ok_or_else(|| ForecastError::malformed("-", "weather", "is missing from the response"))?;

    let records = days
        .iter()
        .enumerate()
        .map(|(idx, day)| flatten_day(idx, day))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(days = records.len(), "flattened forecast");
    Ok(ForecastTable::new(records))
}

fn flatten_day(idx: usize, day: &RawDay) -> Result<DayRecord, ForecastError> {
    let date = day
        .date
        .clone()
        .ok_or_else(|| ForecastError::malformed(format!("#{idx}"), "date", "is missing"))?;

    let required = |field: &'static str, value: &Option<Value>| -> Result<f64, ForecastError> {
        match value {
            None => Err(ForecastError::malformed(&date, field, "is missing")),
            Some(v) => numeric(v).ok_or_else(|| {
                ForecastError::malformed(&date, field, format!("is not a number: {v}"))
            }),
        }
    };

    let max_temp_c = required("maxtempC", &day.max_temp_c)?;
    let min_temp_c = required("mintempC", &day.min_temp_c)?;
    let total_snow_cm = required("totalSnow_cm", &day.total_snow_cm)?;

    let chance_of_snow =
        mean(day.hourly.iter().filter_map(|h| h.chanceofsnow.as_ref().and_then(numeric)));
    let avg_visibility_km =
        mean(day.hourly.iter().filter_map(|h| h.visibility.as_ref().and_then(numeric)));

    Ok(DayRecord {
        date,
        max_temp_c,
        min_temp_c,
        total_snow_cm,
        chance_of_snow,
        avg_visibility_km,
    })
}

/// Numeric-like text or a bare JSON number.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Unweighted mean; `None` when there is nothing to average.
fn mean(samples: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = samples.fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    (count > 0).then(|| sum / count as f64)
}
