use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::model::Query;

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch(&self, endpoint: &str, query: &Query) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("appid", self.api_key.clone()),
            ("units", query.settings.units().as_str().to_string()),
            ("lang", query.settings.language().code().to_string()),
        ];
        params.extend(query.location.query_pairs());

        info!(endpoint, location = ?query.location, units = %query.settings.units(), "fetching from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        let mut payload: Value = serde_json::from_str(&body).with_context(|| {
            format!(
                "Failed to parse OpenWeather {endpoint} JSON (status {status}): {}",
                truncate_body(&body)
            )
        })?;

        // Error bodies normally carry `cod`; fall back to the HTTP status when not.
        if let Some(obj) = payload.as_object_mut() {
            obj.entry("cod").or_insert_with(|| json!(status.as_u16()));
        }

        debug!(endpoint, %status, cod = %payload["cod"], "OpenWeather responded");
        Ok(payload)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn current(&self, query: &Query) -> Result<Value> {
        self.fetch("weather", query).await
    }

    async fn forecast(&self, query: &Query) -> Result<Value> {
        self.fetch("forecast", query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "°".repeat(250);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = OpenWeatherSource::with_base_url("k".into(), "http://localhost:1234/");
        assert_eq!(source.base_url, "http://localhost:1234");
    }
}
