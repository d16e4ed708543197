use crate::{Config, coords::Coordinates, model::Query, provider::openweather::OpenWeatherSource};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// Supplies raw provider payloads.
///
/// A returned `Ok` value is the parsed JSON body, whatever its `cod`; `Err`
/// means the fetch itself failed. Judging success is left to the caller.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, query: &Query) -> anyhow::Result<Value>;

    async fn forecast(&self, query: &Query) -> anyhow::Result<Value>;
}

/// Resolves the device position when no city is given.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> anyhow::Result<Coordinates>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl Geolocator for FixedLocation {
    async fn locate(&self) -> anyhow::Result<Coordinates> {
        Ok(self.0)
    }
}

/// For hosts without a positioning service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn locate(&self) -> anyhow::Result<Coordinates> {
        Err(anyhow::anyhow!("Geolocation is not supported."))
    }
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weatherboard configure` and enter your API key."
        )
    })?;

    Ok(Box::new(OpenWeatherSource::new(api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_config_errors_when_missing_api_key() {
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint: run `weatherboard configure`"));
    }

    #[test]
    fn source_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(source_from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn fixed_and_missing_geolocation() {
        let here = Coordinates::new(1.0, 2.0);
        assert_eq!(FixedLocation(here).locate().await.unwrap(), here);
        assert!(NoGeolocation.locate().await.is_err());
    }
}
