use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The service's fixed sampling interval: one hourly entry per day.
pub const HOURLY_INTERVAL: u32 = 24;

#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub api_key: String,
    pub location: String,
    pub num_of_days: u32,
    pub hourly_interval: u32,
}

impl ForecastRequest {
    pub fn new(api_key: impl Into<String>, location: impl Into<String>, num_of_days: u32) -> Self {
        Self {
            api_key: api_key.into(),
            location: location.into(),
            num_of_days,
            hourly_interval: HOURLY_INTERVAL,
        }
    }

    /// Query string parameters in the order the service documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("q", self.location.clone()),
            ("num_of_days", self.num_of_days.to_string()),
            ("format", "json".to_string()),
            ("tp", self.hourly_interval.to_string()),
        ]
    }
}

/// Top-level JSON body returned by the forecast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawForecastResponse {
    pub data: RawData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Vec<RawErrorMsg>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Vec<RawDay>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawErrorMsg {
    pub msg: String,
}

/// One forecast day. Scalars arrive as numeric-like text, sometimes as bare numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDay {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(rename = "maxtempC", default)]
    pub max_temp_c: Option<Value>,

    #[serde(rename = "mintempC", default)]
    pub min_temp_c: Option<Value>,

    #[serde(rename = "totalSnow_cm", default)]
    pub total_snow_cm: Option<Value>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub hourly: Vec<RawHour>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHour {
    #[serde(default)]
    pub chanceofsnow: Option<Value>,

    #[serde(default)]
    pub visibility: Option<Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawHour>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<RawHour>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawForecastResponse {
    /// First service-reported error message, if the `error` list is non-empty.
    pub fn service_error(&self) -> Option<&str> {
        self.data.error.as_deref()?.first().map(|e| e.msg.as_str())
    }
}

/// One flattened forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    #[serde(rename = "max_temp_C")]
    pub max_temp_c: f64,
    #[serde(rename = "min_temp_C")]
    pub min_temp_c: f64,
    pub total_snow_cm: f64,
    pub chance_of_snow: Option<f64>,
    pub avg_visibility_km: Option<f64>,
}

/// Column names, in output order.
pub const COLUMNS: [&str; 6] = [
    "date",
    "max_temp_C",
    "min_temp_C",
    "total_snow_cm",
    "chance_of_snow",
    "avg_visibility_km",
];

/// Ordered per-day records, the exchange format of both output paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable(Vec<DayRecord>);

impl ForecastTable {
    pub fn new(records: Vec<DayRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayRecord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ForecastTable {
    type Item = &'a DayRecord;
    type IntoIter = std::slice::Iter<'a, DayRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
