//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for current weather, the 5-day/3-hour forecast and city geocoding
//! - Day bucketing of forecast samples, unit conversion and condition icons
//! - Cached, debounced city suggestions for type-ahead search
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod client;
pub mod condition;
pub mod config;
pub mod debounce;
pub mod error;
pub mod geocode;
pub mod model;
pub mod suggest;
pub mod units;

pub use aggregate::{DayBucket, ForecastView, daily_buckets, daily_buckets_local, hourly};
pub use client::{WeatherClient, WeatherReport};
pub use condition::{Backdrop, Icon, icon_for};
pub use config::{ApiSettings, Config};
pub use debounce::{Debouncer, RequestGeneration, Ticket};
pub use error::{ConfigError, Endpoint, WeatherError};
pub use geocode::{CityLookup, GeoClient};
pub use model::{Celsius, CitySuggestion, CurrentWeather, Forecast, ForecastSample, LocationQuery, Wind};
pub use suggest::{SuggestionCache, SuggestionClient, SuggestionSession};
pub use units::TemperatureUnit;
