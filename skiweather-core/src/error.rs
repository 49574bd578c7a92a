use thiserror::Error;

/// Everything that can stop a forecast from turning into a table.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Transport or HTTP-status failure of the outbound call.
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// The service answered but reported an application-level error
    /// (bad key, unknown location). Holds the service's message verbatim.
    #[error("Error from API: {0}")]
    Service(String),

    /// A required field of an otherwise successful response could not be used.
    #[error("Malformed forecast data for day {day}: `{field}` {problem}")]
    MalformedData {
        day: String,
        field: &'static str,
        problem: String,
    },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to reach forecast service: {0}")]
    Transport(String),

    #[error("status {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("unexpected response body: {0}")]
    Body(String),
}

impl ForecastError {
    pub(crate) fn malformed(day: impl Into<String>, field: &'static str, problem: impl Into<String>) -> Self {
        ForecastError::MalformedData { day: day.into(), field, problem: problem.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_reason() {
        let err = ForecastError::from(RequestError::Status {
            status: 403,
            reason: "Forbidden".into(),
        });

        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("Forbidden"));
    }

    #[test]
    fn malformed_names_field_and_day() {
        let err = ForecastError::malformed("2024-12-13", "maxtempC", "is missing");
        assert_eq!(
            err.to_string(),
            "Malformed forecast data for day 2024-12-13: `maxtempC` is missing"
        );
    }
}
