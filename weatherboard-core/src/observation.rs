use serde_json::Value;

use crate::{
    coords::Coordinates,
    error::{CoreError, CoreResult},
    payload::{OneOrMany, RawClouds, RawCurrent, RawForecastPoint, RawMain, RawWeatherClass, RawWind},
    time_fmt,
    units::UnitSystem,
};

/// Temperature family, in the units the provider was asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub current: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
}

/// Pressure readings in hPa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pressure {
    pub station: f64,
    pub sea_level: Option<f64>,
    pub ground_level: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    pub speed: f64,
    pub direction_degrees: Option<f64>,
    pub gust: Option<f64>,
}

/// Provider weather classifier (`Rain`, `light rain`, `10d`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherClass {
    pub main: String,
    pub description: String,
    pub icon_id: String,
}

/// One atmospheric reading, shared by current weather and forecast points.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: i64,
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub humidity_percent: u8,
    pub clouds_percent: u8,
    pub visibility_meters: Option<u32>,
    pub wind: Wind,
    pub weather: WeatherClass,
    pub units: UnitSystem,
}

impl Observation {
    fn from_parts(
        timestamp: i64,
        main: RawMain,
        clouds: RawClouds,
        visibility_meters: Option<u32>,
        weather: OneOrMany<RawWeatherClass>,
        wind: RawWind,
        units: UnitSystem,
    ) -> CoreResult<Self> {
        let weather = weather.into_first()?;

        Ok(Self {
            timestamp,
            temperature: Temperature {
                current: main.temp,
                feels_like: main.feels_like,
                min: main.temp_min,
                max: main.temp_max,
            },
            pressure: Pressure {
                station: main.pressure,
                sea_level: main.sea_level,
                ground_level: main.grnd_level,
            },
            humidity_percent: main.humidity,
            clouds_percent: clouds.percent(),
            visibility_meters,
            wind: Wind {
                speed: wind.speed,
                direction_degrees: wind.deg,
                gust: wind.gust,
            },
            weather: WeatherClass {
                main: weather.main,
                description: weather.description,
                icon_id: weather.icon,
            },
            units,
        })
    }
}

/// Capability set common to every kind of reading.
pub trait Snapshot {
    fn observation(&self) -> &Observation;

    fn timestamp(&self) -> i64 {
        self.observation().timestamp
    }

    fn temperature(&self) -> &Temperature {
        &self.observation().temperature
    }

    fn pressure(&self) -> &Pressure {
        &self.observation().pressure
    }

    fn humidity_percent(&self) -> u8 {
        self.observation().humidity_percent
    }

    fn clouds_percent(&self) -> u8 {
        self.observation().clouds_percent
    }

    fn wind(&self) -> &Wind {
        &self.observation().wind
    }

    fn weather(&self) -> &WeatherClass {
        &self.observation().weather
    }

    fn units(&self) -> UnitSystem {
        self.observation().units
    }

    fn weather_description_capitalized(&self) -> String {
        capitalize(&self.observation().weather.description)
    }

    fn date_time_display(&self) -> CoreResult<String> {
        time_fmt::to_local_display_date_time(self.timestamp())
    }
}

/// Current-weather reading with the location and sun data only it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentObservation {
    pub observation: Observation,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub timezone_offset_seconds: Option<i32>,
    pub city_id: Option<i64>,
    pub city_name: Option<String>,
    pub country_code: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl CurrentObservation {
    pub fn from_raw(raw: RawCurrent, units: UnitSystem) -> CoreResult<Self> {
        let observation = Observation::from_parts(
            raw.dt,
            raw.main,
            raw.clouds,
            raw.visibility,
            raw.weather,
            raw.wind,
            units,
        )?;

        Ok(Self {
            observation,
            sunrise: raw.sys.sunrise,
            sunset: raw.sys.sunset,
            timezone_offset_seconds: raw.timezone,
            city_id: raw.id,
            city_name: raw.name,
            country_code: raw.sys.country,
            coordinates: raw.coord.map(|c| Coordinates::new(c.lat, c.lon)),
        })
    }

    pub fn from_value(value: Value, units: UnitSystem) -> CoreResult<Self> {
        let raw: RawCurrent = serde_json::from_value(value)?;
        Self::from_raw(raw, units)
    }

    pub fn sunrise_display(&self) -> CoreResult<Option<String>> {
        self.sunrise.map(time_fmt::to_local_display_time).transpose()
    }

    pub fn sunset_display(&self) -> CoreResult<Option<String>> {
        self.sunset.map(time_fmt::to_local_display_time).transpose()
    }
}

impl Snapshot for CurrentObservation {
    fn observation(&self) -> &Observation {
        &self.observation
    }
}

/// A 3-hour forecast point.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyObservation {
    pub observation: Observation,
    /// Probability of precipitation in `[0, 1]`; `0` when the provider omits it.
    pub precipitation_probability: f64,
}

impl HourlyObservation {
    pub fn from_raw(raw: RawForecastPoint, units: UnitSystem) -> CoreResult<Self> {
        let observation = Observation::from_parts(
            raw.dt,
            raw.main,
            raw.clouds,
            raw.visibility,
            raw.weather,
            raw.wind,
            units,
        )?;

        Ok(Self {
            observation,
            precipitation_probability: raw.pop.unwrap_or(0.0),
        })
    }

    pub fn from_value(value: Value, units: UnitSystem) -> CoreResult<Self> {
        let raw: RawForecastPoint = serde_json::from_value(value)?;
        Self::from_raw(raw, units)
    }

    /// Builds one observation per element of a JSON sequence of forecast points.
    pub fn many_from_value(value: &Value, units: UnitSystem) -> CoreResult<Vec<Self>> {
        let points = value
            .as_array()
            .ok_or_else(|| CoreError::invalid_argument("Only arrays of hourly forecasts allowed"))?;

        points
            .iter()
            .map(|p| Self::from_value(p.clone(), units))
            .collect()
    }

    pub fn time_display(&self) -> CoreResult<String> {
        time_fmt::to_local_display_time(self.observation.timestamp)
    }
}

impl Snapshot for HourlyObservation {
    fn observation(&self) -> &Observation {
        &self.observation
    }
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{Value, json};

    pub fn current_json() -> Value {
        json!({
            "coord": { "lon": 24.0311, "lat": 49.843 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "base": "stations",
            "main": {
                "temp": 12.64, "feels_like": 11.97, "temp_min": 11.5, "temp_max": 13.52,
                "pressure": 1012, "humidity": 77, "sea_level": 1012, "grnd_level": 979
            },
            "visibility": 10000,
            "wind": { "speed": 4.12, "deg": 250 },
            "clouds": { "all": 75 },
            "dt": 1_710_511_500,
            "sys": { "country": "UA", "sunrise": 1_710_476_100, "sunset": 1_710_518_700 },
            "timezone": 7200,
            "id": 702_550,
            "name": "Lviv",
            "cod": 200
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn point_json(dt: i64, temp_min: f64, temp_max: f64, humidity: u8, speed: f64, pop: f64, description: &str, icon: &str) -> Value {
        json!({
            "dt": dt,
            "main": {
                "temp": (temp_min + temp_max) / 2.0, "feels_like": temp_min,
                "temp_min": temp_min, "temp_max": temp_max,
                "pressure": 1010, "humidity": humidity
            },
            "weather": [{ "main": "Clouds", "description": description, "icon": icon }],
            "clouds": { "all": 40 },
            "wind": { "speed": speed, "deg": 180, "gust": speed * 2.0 },
            "visibility": 10000,
            "pop": pop,
            "sys": { "pod": "d" }
        })
    }
}
