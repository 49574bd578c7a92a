use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::ForecastError,
    model::{ForecastTable, RawForecastResponse},
    transform,
};

pub mod worldweather;

pub use worldweather::WorldWeatherProvider;

/// Anything that can answer a forecast query with the service's raw day → hour payload.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn get_forecast(
        &self,
        location: &str,
        num_of_days: u32,
    ) -> Result<RawForecastResponse, ForecastError>;
}

/// Fetch a forecast and flatten it. The first failing stage decides the error.
pub async fn fetch_forecast_table(
    source: &dyn ForecastSource,
    location: &str,
    num_of_days: u32,
) -> Result<ForecastTable, ForecastError> {
    let raw = source.get_forecast(location, num_of_days).await?;
    transform::flatten(&raw)
}
