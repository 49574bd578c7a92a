use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as _;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::{ForecastError, RequestError},
    model::{ForecastRequest, RawForecastResponse},
};

use super::ForecastSource;

/// World Weather Online forecast client. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct WorldWeatherProvider {
    config: ClientConfig,
    http: Client,
}

impl WorldWeatherProvider {
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http: Client::new() }
    }

    async fn fetch(&self, request: &ForecastRequest) -> Result<RawForecastResponse, ForecastError> {
        debug!(
            location = %request.location,
            num_of_days = request.num_of_days,
            url = %self.config.base_url,
            "requesting forecast"
        );

        let res = self
            .http
            .get(&self.config.base_url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| RequestError::Transport(describe(e)))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| RequestError::Transport(describe(e)))?;

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), body = %truncate_body(&body), "forecast request rejected");
            return Err(RequestError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }

        let parsed: RawForecastResponse = serde_json::from_str(&body).map_err(|e| {
            debug!(body = %truncate_body(&body), "unparseable forecast body");
            RequestError::Body(e.to_string())
        })?;

        if let Some(msg) = parsed.service_error() {
            warn!(service_message = msg, "forecast service reported an error");
            return Err(ForecastError::Service(msg.to_string()));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl ForecastSource for WorldWeatherProvider {
    async fn get_forecast(
        &self,
        location: &str,
        num_of_days: u32,
    ) -> Result<RawForecastResponse, ForecastError> {
        let request = ForecastRequest::new(self.config.api_key.as_str(), location, num_of_days);
        self.fetch(&request).await
    }
}

/// Error text with its causes, without the request URL (it carries the API key).
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
