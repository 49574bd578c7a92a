//! Core library for the `skiweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast source (one request per call, errors classified into [`ForecastError`])
//! - Flattening of the nested day → hour payload into a [`ForecastTable`]
//! - CSV and chart output for a flattened table
//!
//! It is used by `skiweather-cli`, but can also be reused by other binaries or services.

pub mod chart;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod table;
pub mod transform;

pub use config::{ClientConfig, Config};
pub use error::{ForecastError, RequestError};
pub use model::{DayRecord, ForecastRequest, ForecastTable, RawForecastResponse};
pub use provider::{ForecastSource, WorldWeatherProvider, fetch_forecast_table};
