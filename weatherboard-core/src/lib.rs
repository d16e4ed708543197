//! Core library for the `weatherboard` dashboard.
//!
//! This crate defines:
//! - Normalization of OpenWeather payloads into observations
//! - Daily aggregation and calendar-day bucketing of the 3-hour forecast
//! - Publishing of unit-suffixed, display-ready views
//! - The request orchestrator and the OpenWeather source behind it
//! - Configuration handling
//!
//! It is used by `weatherboard-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod bucket;
pub mod config;
pub mod coords;
pub mod dashboard;
pub mod error;
pub mod language;
pub mod model;
pub mod observation;
pub mod payload;
pub mod provider;
pub mod publish;
pub mod time_fmt;
pub mod units;

pub use aggregate::DailyAggregate;
pub use bucket::{BucketPolicy, ForecastBucketizer};
pub use config::Config;
pub use coords::Coordinates;
pub use dashboard::{Dashboard, DashboardView};
pub use error::{CoreError, CoreResult};
pub use language::Language;
pub use model::{LocationQuery, Query, RequestSettings};
pub use observation::{CurrentObservation, HourlyObservation, Snapshot};
pub use provider::{Geolocator, WeatherSource};
pub use publish::Published;
pub use units::{QuantityKind, UnitSystem};
