//! Request orchestration: resolve a location, fetch, route failures, and turn
//! successful payloads into published views.

use chrono::{Local, TimeZone};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use tracing::{info, warn};

use crate::{
    aggregate::DailyAggregate,
    bucket::{BucketPolicy, ForecastBucketizer, daily_slice},
    coords::Coordinates,
    error::{CoreError, CoreResult},
    model::{LocationQuery, Query, RequestSettings},
    observation::{CurrentObservation, HourlyObservation, capitalize},
    payload::{self, RawForecast},
    provider::{Geolocator, WeatherSource},
    publish::{CurrentView, DailyView, HourlyView, Published},
};

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardView {
    Daily {
        current: Published<CurrentView>,
        hourly: Vec<Published<HourlyView>>,
        summary: Published<DailyView>,
    },
    FiveDay {
        location_name: String,
        days: Vec<Published<DailyView>>,
    },
    NotFound {
        query: Option<String>,
    },
}

impl DashboardView {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardView::NotFound { .. })
    }
}

#[derive(Debug)]
pub struct Dashboard<Tz: TimeZone = Local> {
    source: Box<dyn WeatherSource>,
    locator: Box<dyn Geolocator>,
    settings: RequestSettings,
    fallback: Coordinates,
    policy: BucketPolicy,
    tz: Tz,
}

impl Dashboard<Local> {
    pub fn new(
        source: Box<dyn WeatherSource>,
        locator: Box<dyn Geolocator>,
        settings: RequestSettings,
    ) -> Self {
        Self {
            source,
            locator,
            settings,
            fallback: Coordinates::FALLBACK,
            policy: BucketPolicy::reference(),
            tz: Local,
        }
    }
}

impl<Tz> Dashboard<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn with_fallback(mut self, fallback: Coordinates) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_bucket_policy(mut self, policy: BucketPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render in `tz` instead of the host's local timezone.
    pub fn with_timezone<T: TimeZone>(self, tz: T) -> Dashboard<T> {
        Dashboard {
            source: self.source,
            locator: self.locator,
            settings: self.settings,
            fallback: self.fallback,
            policy: self.policy,
            tz,
        }
    }

    pub fn settings(&self) -> RequestSettings {
        self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RequestSettings {
        &mut self.settings
    }

    /// Current weather plus the next 24 hours.
    pub async fn daily_forecast(&self, city: Option<&str>) -> CoreResult<DashboardView> {
        let query = self.resolve(city).await;
        let (current, forecast) =
            tokio::join!(self.source.current(&query), self.source.forecast(&query));

        let payloads = check("current weather", current)
            .and_then(|c| Ok((c, check("forecast", forecast)?)));

        match payloads {
            Ok((current, forecast)) => self.build_daily(current, forecast),
            Err(err) => recover(err, city),
        }
    }

    /// One summary per calendar day of the forecast.
    pub async fn five_day_forecast(&self, city: Option<&str>) -> CoreResult<DashboardView> {
        let query = self.resolve(city).await;
        let forecast = self.source.forecast(&query).await;

        match check("forecast", forecast) {
            Ok(forecast) => self.build_five_day(forecast, city),
            Err(err) => recover(err, city),
        }
    }

    async fn resolve(&self, city: Option<&str>) -> Query {
        let location = match requested_city(city) {
            Some(name) => LocationQuery::City(name.to_string()),
            None => match self.locator.locate().await {
                Ok(coords) => LocationQuery::Coordinates(coords),
                Err(err) => {
                    warn!(error = %err, fallback = ?self.fallback, "geolocation failed, using fallback location");
                    LocationQuery::Coordinates(self.fallback)
                }
            },
        };

        Query {
            location,
            settings: self.settings,
        }
    }

    fn parse_forecast(&self, forecast: Value) -> CoreResult<(RawForecast, Vec<HourlyObservation>)> {
        let raw: RawForecast = serde_json::from_value(forecast)?;
        let points = HourlyObservation::many_from_value(&raw.list, self.settings.units())?;
        Ok((raw, points))
    }

    fn build_daily(&self, current: Value, forecast: Value) -> CoreResult<DashboardView> {
        let units = self.settings.units();
        let current = CurrentObservation::from_value(current, units)?;
        let (_, points) = self.parse_forecast(forecast)?;
        let day = daily_slice(&points);

        let hourly = day
            .iter()
            .map(|p| p.publish_in(&self.tz))
            .collect::<CoreResult<Vec<_>>>()?;
        let summary = DailyAggregate::new(day.to_vec(), units).publish_in(&self.tz)?;

        info!(hourly = hourly.len(), city = ?current.city_name, "built daily view");

        Ok(DashboardView::Daily {
            current: current.publish_in(&self.tz)?,
            hourly,
            summary,
        })
    }

    fn build_five_day(&self, forecast: Value, city: Option<&str>) -> CoreResult<DashboardView> {
        let units = self.settings.units();
        let (raw, points) = self.parse_forecast(forecast)?;

        let days = ForecastBucketizer::with_timezone(self.policy, self.tz.clone())
            .bucketize(&points, units)?
            .iter()
            .map(|day| day.publish_in(&self.tz))
            .collect::<CoreResult<Vec<_>>>()?;

        let location_name = capitalize(requested_city(city).unwrap_or(&raw.city.name));
        info!(days = days.len(), location = %location_name, "built five-day view");

        Ok(DashboardView::FiveDay {
            location_name,
            days,
        })
    }
}

fn requested_city(city: Option<&str>) -> Option<&str> {
    city.map(str::trim).filter(|c| !c.is_empty())
}

/// Keeps only payloads that may enter the aggregation path.
fn check(what: &str, fetched: anyhow::Result<Value>) -> CoreResult<Value> {
    let payload =
        fetched.map_err(|err| CoreError::upstream(format!("{what} fetch failed: {err:#}")))?;

    if payload::is_success(&payload) {
        Ok(payload)
    } else {
        Err(CoreError::upstream(format!(
            "{what} request failed with {}",
            payload::failure_reason(&payload)
        )))
    }
}

/// Upstream failures become the "not found" view; contract errors propagate.
fn recover(err: CoreError, city: Option<&str>) -> CoreResult<DashboardView> {
    match err {
        CoreError::UpstreamFailure(reason) => {
            warn!(%reason, ?city, "weather unavailable");
            Ok(DashboardView::NotFound {
                query: requested_city(city).map(capitalize),
            })
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        language::Language,
        observation::fixtures::{current_json, point_json},
        provider::{FixedLocation, NoGeolocation},
        units::UnitSystem,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    // 2024-03-15T00:00:00Z
    const DAY_START: i64 = 1_710_460_800;

    fn forecast_json(count: usize) -> Value {
        let list: Vec<Value> = (0..count)
            .map(|i| {
                point_json(
                    DAY_START + i as i64 * 10_800,
                    5.0 + i as f64,
                    10.0 + i as f64,
                    60,
                    3.0,
                    0.25,
                    "scattered clouds",
                    "03d",
                )
            })
            .collect();
        json!({ "cod": "200", "city": { "name": "lviv", "country": "UA" }, "list": list })
    }

    #[derive(Debug)]
    struct StubSource {
        current: Option<Value>,
        forecast: Option<Value>,
        queries: Arc<Mutex<Vec<Query>>>,
    }

    impl StubSource {
        fn new(current: Option<Value>, forecast: Option<Value>) -> Self {
            Self {
                current,
                forecast,
                queries: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for StubSource {
        async fn current(&self, query: &Query) -> anyhow::Result<Value> {
            self.queries.lock().unwrap().push(query.clone());
            self.current
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn forecast(&self, query: &Query) -> anyhow::Result<Value> {
            self.queries.lock().unwrap().push(query.clone());
            self.forecast
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn dashboard(source: StubSource) -> Dashboard<Utc> {
        Dashboard::new(
            Box::new(source),
            Box::new(NoGeolocation),
            RequestSettings::new(UnitSystem::Metric, Language::ENGLISH),
        )
        .with_timezone(Utc)
    }

    #[tokio::test]
    async fn daily_view_publishes_current_and_eight_points() {
        let board = dashboard(StubSource::new(Some(current_json()), Some(forecast_json(40))));

        let view = board.daily_forecast(Some("Lviv")).await.unwrap();
        let DashboardView::Daily { current, hourly, summary } = view else {
            panic!("expected daily view");
        };

        assert_eq!(current.observation.temperature.current, "13°C");
        assert_eq!(current.city_name.as_deref(), Some("Lviv"));
        assert_eq!(hourly.len(), 8);
        assert_eq!(hourly[0].time, "12:00 AM");
        assert_eq!(hourly[0].precipitation, "25%");
        assert_eq!(summary.point_count, 8);
        assert_eq!(summary.max_temperature.as_deref(), Some("17°C"));
        assert_eq!(summary.min_temperature.as_deref(), Some("5°C"));
    }

    #[tokio::test]
    async fn short_forecast_list_is_fine() {
        let board = dashboard(StubSource::new(Some(current_json()), Some(forecast_json(3))));

        let DashboardView::Daily { hourly, .. } = board.daily_forecast(None).await.unwrap() else {
            panic!("expected daily view");
        };
        assert_eq!(hourly.len(), 3);
    }

    #[tokio::test]
    async fn failed_status_routes_to_not_found() {
        let not_found = json!({ "cod": "404", "message": "city not found" });
        let board = dashboard(StubSource::new(Some(not_found.clone()), Some(not_found)));

        let view = board.daily_forecast(Some("atlantis")).await.unwrap();
        assert_eq!(view, DashboardView::NotFound { query: Some("Atlantis".into()) });

        let view = board.five_day_forecast(Some("atlantis")).await.unwrap();
        assert!(view.is_not_found());
    }

    #[tokio::test]
    async fn one_failed_payload_is_enough_to_skip_aggregation() {
        let board = dashboard(StubSource::new(
            Some(current_json()),
            Some(json!({ "cod": 404, "message": "city not found" })),
        ));

        assert!(board.daily_forecast(Some("x")).await.unwrap().is_not_found());
    }

    #[tokio::test]
    async fn transport_failure_routes_to_not_found() {
        let board = dashboard(StubSource::new(None, None));
        let view = board.five_day_forecast(None).await.unwrap();
        assert_eq!(view, DashboardView::NotFound { query: None });
    }

    #[tokio::test]
    async fn malformed_success_payload_fails_fast() {
        let board = dashboard(StubSource::new(
            Some(current_json()),
            Some(json!({ "cod": 200, "city": { "name": "x" }, "list": { "not": "a list" } })),
        ));

        let err = board.daily_forecast(Some("x")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn five_day_uses_payload_city_and_policy() {
        let source = StubSource::new(None, Some(forecast_json(24)));
        let board = dashboard(source);

        let DashboardView::FiveDay { location_name, days } =
            board.five_day_forecast(None).await.unwrap()
        else {
            panic!("expected five-day view");
        };
        assert_eq!(location_name, "Lviv");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_of_week.as_deref(), Some("Friday"));
        assert_eq!(days[1].date.as_deref(), Some("March 16"));

        let board = dashboard(StubSource::new(None, Some(forecast_json(24))))
            .with_bucket_policy(BucketPolicy::corrected());
        let DashboardView::FiveDay { days, .. } = board.five_day_forecast(Some("kyiv")).await.unwrap()
        else {
            panic!("expected five-day view");
        };
        assert_eq!(days.len(), 3);
    }

    #[tokio::test]
    async fn geolocation_and_fallback_shape_the_query() {
        let source = StubSource::new(None, Some(forecast_json(8)));
        let queries = source.queries.clone();
        let fallback = Coordinates::new(10.0, 20.0);
        let board = dashboard(source).with_fallback(fallback);

        board.five_day_forecast(None).await.unwrap();
        board.five_day_forecast(Some("  ")).await.unwrap();
        board.five_day_forecast(Some("Odesa")).await.unwrap();

        let seen = queries.lock().unwrap();
        assert_eq!(seen[0].location, LocationQuery::Coordinates(fallback));
        assert_eq!(seen[1].location, LocationQuery::Coordinates(fallback));
        assert_eq!(seen[2].location, LocationQuery::City("Odesa".into()));

        let here = Coordinates::new(1.5, 2.5);
        let source = StubSource::new(None, Some(forecast_json(8)));
        let queries = source.queries.clone();
        let board = Dashboard::new(
            Box::new(source),
            Box::new(FixedLocation(here)),
            RequestSettings::default(),
        )
        .with_timezone(Utc);
        board.five_day_forecast(None).await.unwrap();
        assert_eq!(queries.lock().unwrap()[0].location, LocationQuery::Coordinates(here));
    }

    #[tokio::test]
    async fn unit_change_applies_to_next_render() {
        let mut board = dashboard(StubSource::new(Some(current_json()), Some(forecast_json(8))));

        assert!(board.settings_mut().set_units("kelvin").is_err());
        board.settings_mut().set_units("imperial").unwrap();

        let DashboardView::Daily { current, .. } = board.daily_forecast(None).await.unwrap() else {
            panic!("expected daily view");
        };
        assert_eq!(current.observation.temperature.current, "13°F");
        assert_eq!(board.settings().units(), UnitSystem::Imperial);
    }
}
