//! Display-ready, unit-suffixed views.
//!
//! Publishing reads a raw observation or aggregate and builds a brand new view;
//! the source keeps its numeric fields. A [`Published`] value only hands out
//! shared references, and views hold strings, so they cannot be fed back into
//! aggregation.

use chrono::{Local, TimeZone};
use serde::Serialize;
use std::{fmt::Display, ops::Deref};

use crate::{
    aggregate::DailyAggregate,
    coords::Coordinates,
    error::CoreResult,
    observation::{CurrentObservation, HourlyObservation, Observation, Snapshot, capitalize},
    time_fmt,
    units::{QuantityKind, UnitSystem, format_optional, format_quantity},
};

/// A terminal, display-only value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Published<V>(V);

impl<V> Published<V> {
    fn new(view: V) -> Self {
        Self(view)
    }
}

impl<V> Deref for Published<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureView {
    pub current: String,
    pub feels_like: String,
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureView {
    pub station: String,
    pub sea_level: Option<String>,
    pub ground_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindView {
    pub speed: String,
    pub direction: Option<String>,
    pub gust: Option<String>,
}

/// Fields every published reading has.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationView {
    pub timestamp: i64,
    pub date_time: String,
    pub temperature: TemperatureView,
    pub pressure: PressureView,
    pub humidity: String,
    pub clouds: String,
    pub visibility: Option<String>,
    pub wind: WindView,
    pub weather_main: String,
    pub weather_description: String,
    pub weather_icon: String,
    pub units: UnitSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    #[serde(flatten)]
    pub observation: ObservationView,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub city_id: Option<i64>,
    pub city_name: Option<String>,
    pub country_code: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub timezone_offset_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyView {
    #[serde(flatten)]
    pub observation: ObservationView,
    pub time: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyView {
    pub timestamp: Option<i64>,
    pub day_of_week: Option<String>,
    pub date: Option<String>,
    pub date_time: Option<String>,
    pub max_temperature: Option<String>,
    pub min_temperature: Option<String>,
    pub precipitation: Option<String>,
    pub humidity: String,
    pub wind_speed: String,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
    pub point_count: usize,
    pub units: UnitSystem,
}

fn percent(value: f64, units: UnitSystem) -> String {
    format_quantity(value, QuantityKind::Percent, units)
}

/// Probability in `[0, 1]` rendered as a whole percentage.
fn probability(value: f64, units: UnitSystem) -> String {
    percent(value * 100.0, units)
}

impl ObservationView {
    fn build<Tz>(obs: &Observation, tz: &Tz) -> CoreResult<Self>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let units = obs.units;
        let temp = |v: f64| format_quantity(v, QuantityKind::Temperature, units);
        let hpa = |v: Option<f64>| format_optional(v, QuantityKind::Pressure, units);
        let speed = |v: Option<f64>| format_optional(v, QuantityKind::Speed, units);

        Ok(Self {
            timestamp: obs.timestamp,
            date_time: time_fmt::display_date_time_in(obs.timestamp, tz)?,
            temperature: TemperatureView {
                current: temp(obs.temperature.current),
                feels_like: temp(obs.temperature.feels_like),
                min: temp(obs.temperature.min),
                max: temp(obs.temperature.max),
            },
            pressure: PressureView {
                station: format_quantity(obs.pressure.station, QuantityKind::Pressure, units),
                sea_level: hpa(obs.pressure.sea_level),
                ground_level: hpa(obs.pressure.ground_level),
            },
            humidity: percent(f64::from(obs.humidity_percent), units),
            clouds: percent(f64::from(obs.clouds_percent), units),
            visibility: obs.visibility_meters.map(|m| format!("{m} m")),
            wind: WindView {
                speed: format_quantity(obs.wind.speed, QuantityKind::Speed, units),
                direction: obs.wind.direction_degrees.map(|d| format!("{d}°")),
                gust: speed(obs.wind.gust),
            },
            weather_main: obs.weather.main.clone(),
            weather_description: capitalize(&obs.weather.description),
            weather_icon: obs.weather.icon_id.clone(),
            units,
        })
    }
}

impl CurrentObservation {
    pub fn publish(&self) -> CoreResult<Published<CurrentView>> {
        self.publish_in(&Local)
    }

    pub fn publish_in<Tz>(&self, tz: &Tz) -> CoreResult<Published<CurrentView>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let sun = |ts: Option<i64>| ts.map(|t| time_fmt::display_time_in(t, tz)).transpose();

        Ok(Published::new(CurrentView {
            observation: ObservationView::build(&self.observation, tz)?,
            sunrise: sun(self.sunrise)?,
            sunset: sun(self.sunset)?,
            city_id: self.city_id,
            city_name: self.city_name.clone(),
            country_code: self.country_code.clone(),
            coordinates: self.coordinates,
            timezone_offset_seconds: self.timezone_offset_seconds,
        }))
    }
}

impl HourlyObservation {
    pub fn publish(&self) -> CoreResult<Published<HourlyView>> {
        self.publish_in(&Local)
    }

    pub fn publish_in<Tz>(&self, tz: &Tz) -> CoreResult<Published<HourlyView>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Ok(Published::new(HourlyView {
            observation: ObservationView::build(&self.observation, tz)?,
            time: time_fmt::display_time_in(self.timestamp(), tz)?,
            precipitation: probability(self.precipitation_probability, self.units()),
        }))
    }
}

impl DailyAggregate {
    pub fn publish(&self) -> CoreResult<Published<DailyView>> {
        self.publish_in(&Local)
    }

    pub fn publish_in<Tz>(&self, tz: &Tz) -> CoreResult<Published<DailyView>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let units = self.units();
        let ts = self.timestamp();

        Ok(Published::new(DailyView {
            timestamp: ts,
            day_of_week: ts
                .map(|t| time_fmt::weekday_name_in(t, tz).map(str::to_string))
                .transpose()?,
            date: ts.map(|t| time_fmt::month_day_in(t, tz)).transpose()?,
            date_time: ts.map(|t| time_fmt::display_date_time_in(t, tz)).transpose()?,
            max_temperature: format_optional(self.max_temperature(), QuantityKind::Temperature, units),
            min_temperature: format_optional(self.min_temperature(), QuantityKind::Temperature, units),
            precipitation: self
                .modal_precipitation_probability()
                .map(|p| probability(p, units)),
            humidity: percent(self.mean_humidity(), units),
            wind_speed: format_quantity(self.mean_wind_speed(), QuantityKind::Speed, units),
            weather_description: self.modal_weather_description().map(str::to_string),
            weather_icon: self.modal_weather_icon().map(str::to_string),
            point_count: self.points().len(),
            units,
        }))
    }
}
