use serde_json::Value;
use tracing::debug;

use crate::{
    error::CoreResult,
    observation::{HourlyObservation, Snapshot},
    time_fmt,
    units::UnitSystem,
};

/// Summary of a run of forecast points, usually one calendar day.
///
/// All statistics are derived once from raw numerics at construction. The
/// aggregate is never mutated afterwards, so it can be published any number
/// of times.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    points: Vec<HourlyObservation>,
    units: UnitSystem,
    max_temperature: Option<f64>,
    min_temperature: Option<f64>,
    modal_precipitation_probability: Option<f64>,
    modal_weather_description: Option<String>,
    modal_weather_icon: Option<String>,
    mean_humidity: f64,
    mean_wind_speed: f64,
}

impl DailyAggregate {
    pub fn new(points: Vec<HourlyObservation>, units: UnitSystem) -> Self {
        let max_temperature = points
            .iter()
            .map(|p| p.temperature().max)
            .reduce(f64::max);
        let min_temperature = points
            .iter()
            .map(|p| p.temperature().min)
            .reduce(f64::min);

        let pops: Vec<f64> = points.iter().map(|p| p.precipitation_probability).collect();
        let descriptions: Vec<String> = points
            .iter()
            .map(|p| p.weather_description_capitalized())
            .collect();
        let icons: Vec<&str> = points.iter().map(|p| p.weather().icon_id.as_str()).collect();

        let mean_humidity = mean(points.iter().map(|p| f64::from(p.humidity_percent())));
        let mean_wind_speed = mean(points.iter().map(|p| p.wind().speed));

        debug!(
            points = points.len(),
            ?max_temperature,
            ?min_temperature,
            mean_humidity,
            mean_wind_speed,
            "built daily aggregate"
        );

        Self {
            modal_precipitation_probability: mode(&pops),
            modal_weather_description: mode(&descriptions),
            modal_weather_icon: mode(&icons).map(str::to_string),
            points,
            units,
            max_temperature,
            min_temperature,
            mean_humidity,
            mean_wind_speed,
        }
    }

    /// Builds an aggregate from a JSON sequence of raw forecast points.
    pub fn from_value(value: &Value, units: UnitSystem) -> CoreResult<Self> {
        let points = HourlyObservation::many_from_value(value, units)?;
        Ok(Self::new(points, units))
    }

    pub fn points(&self) -> &[HourlyObservation] {
        &self.points
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.max_temperature
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.min_temperature
    }

    pub fn modal_precipitation_probability(&self) -> Option<f64> {
        self.modal_precipitation_probability
    }

    pub fn modal_weather_description(&self) -> Option<&str> {
        self.modal_weather_description.as_deref()
    }

    pub fn modal_weather_icon(&self) -> Option<&str> {
        self.modal_weather_icon.as_deref()
    }

    pub fn mean_humidity(&self) -> f64 {
        self.mean_humidity
    }

    pub fn mean_wind_speed(&self) -> f64 {
        self.mean_wind_speed
    }

    /// Timestamp of the first point.
    pub fn timestamp(&self) -> Option<i64> {
        self.points.first().map(|p| p.timestamp())
    }

    pub fn day_of_week(&self) -> CoreResult<Option<&'static str>> {
        self.timestamp()
            .map(|ts| time_fmt::weekday_name_in(ts, &chrono::Local))
            .transpose()
    }

    pub fn date_time_display(&self) -> CoreResult<Option<String>> {
        self.timestamp()
            .map(time_fmt::to_local_display_date_time)
            .transpose()
    }
}

/// Most frequent value. Among values tied for the highest count, the one
/// occurring last in `values` wins; `[A, A, B, B]` yields `B`.
pub fn mode<T: PartialEq + Clone>(values: &[T]) -> Option<T> {
    let counts: Vec<usize> = values
        .iter()
        .map(|v| values.iter().filter(|other| *other == v).count())
        .collect();
    let highest = counts.iter().copied().max()?;

    values
        .iter()
        .zip(&counts)
        .rev()
        .find(|(_, count)| **count == highest)
        .map(|(v, _)| v.clone())
}

/// Arithmetic mean; `0` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, len) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, len), v| (sum + v, len + 1));

    if len == 0 { 0.0 } else { sum / len as f64 }
}
