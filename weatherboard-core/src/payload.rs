//! Wire shapes of the OpenWeather `weather` and `forecast` endpoints.
//!
//! These types mirror the provider JSON closely and are only used to build
//! observations; nothing outside the crate needs to touch them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

const SUCCESS: i64 = 200;

/// Reads the `cod` field, which the provider sends as a number on success and
/// as a string (`"404"`) on most failures.
pub fn status_code(payload: &Value) -> Option<i64> {
    match payload.get("cod")? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a payload should enter the aggregation path.
pub fn is_success(payload: &Value) -> bool {
    status_code(payload) == Some(SUCCESS)
}

/// Human-readable reason for a failed payload.
pub fn failure_reason(payload: &Value) -> String {
    let code = payload
        .get("cod")
        .map(|c| c.to_string())
        .unwrap_or_else(|| "missing".to_string());

    match payload.get("message").and_then(Value::as_str) {
        Some(msg) => format!("status {code}: {msg}"),
        None => format!("status {code}"),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
    pub sea_level: Option<f64>,
    pub grnd_level: Option<f64>,
}

/// `clouds` arrives either as `{"all": 40}` or as a bare `40`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawClouds {
    Wrapped { all: u8 },
    Bare(u8),
}

impl RawClouds {
    pub fn percent(&self) -> u8 {
        match self {
            RawClouds::Wrapped { all } => *all,
            RawClouds::Bare(v) => *v,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherClass {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// `weather` arrives either as a single record or as a sequence of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> CoreResult<T> {
        match self {
            OneOrMany::One(v) => Ok(v),
            OneOrMany::Many(v) => v
                .into_iter()
                .next()
                .ok_or_else(|| CoreError::invalid_argument("weather classifier list is empty")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    pub speed: f64,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

/// Response of the current-weather endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub clouds: RawClouds,
    pub dt: i64,
    pub main: RawMain,
    #[serde(default)]
    pub sys: RawSys,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub timezone: Option<i32>,
    pub visibility: Option<u32>,
    pub weather: OneOrMany<RawWeatherClass>,
    pub wind: RawWind,
    pub coord: Option<RawCoord>,
}

/// One 3-hour step of the forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastPoint {
    pub clouds: RawClouds,
    pub dt: i64,
    pub main: RawMain,
    pub visibility: Option<u32>,
    pub weather: OneOrMany<RawWeatherClass>,
    pub wind: RawWind,
    pub pop: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<i32>,
    pub coord: Option<RawCoord>,
}

/// Response of the forecast endpoint, with the point list left untyped so its
/// shape can be checked before conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub city: RawCity,
    pub list: Value,
}
