//! OpenWeather-compatible client for current conditions and the
//! 5-day/3-hour forecast.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::{ApiSettings, Config},
    error::{Endpoint, WeatherError},
    model::{Celsius, CurrentWeather, Forecast, ForecastSample, LocationQuery, Wind},
};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("forecast/", env!("CARGO_PKG_VERSION"));
const UNITS: &str = "metric";

/// Fetches weather data. Every call goes to the network; nothing is cached.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    settings: ApiSettings,
    http: Client,
}

/// Both halves of a lookup, kept apart so one can fail without the other.
#[derive(Debug)]
pub struct WeatherReport {
    pub current: Result<CurrentWeather, WeatherError>,
    pub forecast: Result<Forecast, WeatherError>,
}

impl WeatherClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings, http: build_http_client() }
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self::new(config.api_settings()?))
    }

    pub async fn current(&self, location: &LocationQuery) -> Result<CurrentWeather, WeatherError> {
        let parsed: OwCurrentResponse = self.fetch(Endpoint::Current, "weather", location).await?;
        parsed.into_current()
    }

    pub async fn forecast(&self, location: &LocationQuery) -> Result<Forecast, WeatherError> {
        let parsed: OwForecastResponse =
            self.fetch(Endpoint::Forecast, "forecast", location).await?;
        parsed.into_forecast()
    }

    /// Issues the current and forecast requests concurrently.
    pub async fn report(&self, location: &LocationQuery) -> WeatherReport {
        let (current, forecast) = tokio::join!(self.current(location), self.forecast(location));
        WeatherReport { current, forecast }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        location: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.settings.weather_base_url, path);
        let q = location.to_query();
        tracing::debug!(%endpoint, %url, q = %q, "requesting weather data");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("units", UNITS),
                ("appid", self.settings.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        read_json(endpoint, res).await
    }
}

pub(crate) fn build_http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Failed to build configured HTTP client, using defaults: {}", err);
            Client::new()
        })
}

/// Checks the status and parses the body against `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: Endpoint,
    res: reqwest::Response,
) -> Result<T, WeatherError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| WeatherError::Transport { endpoint, source })?;

    if !status.is_success() {
        return Err(WeatherError::Status { endpoint, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body)
        .map_err(|err| WeatherError::Schema { endpoint, detail: err.to_string() })
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[allow(dead_code)]
    id: i64,
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: f64,
}

impl From<OwWind> for Wind {
    fn from(w: OwWind) -> Self {
        Wind { speed_ms: w.speed, direction_deg: w.deg }
    }
}

/// Rain or snow volume; the 1-hour figure wins over the 3-hour one.
#[derive(Debug, Default, Deserialize)]
struct OwVolume {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

impl OwVolume {
    fn millimetres(&self) -> f64 {
        self.one_hour.or(self.three_hours).unwrap_or(0.0)
    }
}

fn precipitation(rain: Option<&OwVolume>, snow: Option<&OwVolume>) -> Option<f64> {
    if rain.is_none() && snow.is_none() {
        return None;
    }
    Some(rain.map_or(0.0, OwVolume::millimetres) + snow.map_or(0.0, OwVolume::millimetres))
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    visibility: Option<u32>,
    sys: OwSys,
    rain: Option<OwVolume>,
    snow: Option<OwVolume>,
}

impl OwCurrentResponse {
    fn into_current(self) -> Result<CurrentWeather, WeatherError> {
        let endpoint = Endpoint::Current;
        let precipitation_mm = precipitation(self.rain.as_ref(), self.snow.as_ref());
        let condition = first_condition(endpoint, self.weather)?;

        Ok(CurrentWeather {
            location_name: self.name,
            temperature: Celsius(self.main.temp),
            feels_like: Celsius(self.main.feels_like),
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            condition_main: condition.main,
            condition_description: condition.description,
            icon_code: condition.icon,
            wind: self.wind.map(Wind::from),
            visibility_m: self.visibility,
            sunrise: unix_to_utc(endpoint, self.sys.sunrise)?,
            sunset: unix_to_utc(endpoint, self.sys.sunset)?,
            precipitation_mm,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    rain: Option<OwVolume>,
    snow: Option<OwVolume>,
    #[allow(dead_code)]
    dt_txt: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_forecast(self) -> Result<Forecast, WeatherError> {
        let samples = self
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast { city: self.city.name, country: self.city.country, samples })
    }
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample, WeatherError> {
        let endpoint = Endpoint::Forecast;
        let precipitation_mm = precipitation(self.rain.as_ref(), self.snow.as_ref());
        let condition = first_condition(endpoint, self.weather)?;

        Ok(ForecastSample {
            time: unix_to_utc(endpoint, self.dt)?,
            temperature: Celsius(self.main.temp),
            feels_like: Celsius(self.main.feels_like),
            humidity_pct: self.main.humidity,
            condition_main: condition.main,
            condition_description: condition.description,
            icon_code: condition.icon,
            wind: self.wind.map(Wind::from),
            precipitation_mm,
        })
    }
}

fn first_condition(endpoint: Endpoint, weather: Vec<OwWeather>) -> Result<OwWeather, WeatherError> {
    weather.into_iter().next().ok_or_else(|| WeatherError::Schema {
        endpoint,
        detail: "`weather` array is empty".to_string(),
    })
}

fn unix_to_utc(endpoint: Endpoint, ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| WeatherError::Schema {
        endpoint,
        detail: format!("timestamp {ts} is out of range"),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast_entry(extra: serde_json::Value) -> OwForecastEntry {
        let mut entry = serde_json::json!({
            "dt": 1_710_028_800,
            "main": { "temp": 11.2, "feels_like": 10.1, "humidity": 81, "pressure": 1012 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "dt_txt": "2024-03-10 00:00:00"
        });
        if let (Some(target), Some(fields)) = (entry.as_object_mut(), extra.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(entry).expect("valid forecast entry")
    }

    #[test]
    fn three_hour_rain_used_when_one_hour_missing() {
        let sample = forecast_entry(serde_json::json!({ "rain": { "3h": 2.0 } }))
            .into_sample()
            .unwrap();
        assert_eq!(sample.precipitation_mm, Some(2.0));
    }

    #[test]
    fn one_hour_figure_preferred() {
        let sample = forecast_entry(serde_json::json!({ "rain": { "1h": 0.4, "3h": 2.0 } }))
            .into_sample()
            .unwrap();
        assert_eq!(sample.precipitation_mm, Some(0.4));
    }

    #[test]
    fn rain_and_snow_are_added() {
        let sample = forecast_entry(serde_json::json!({
            "rain": { "3h": 1.5 },
            "snow": { "1h": 0.5 }
        }))
        .into_sample()
        .unwrap();
        assert_eq!(sample.precipitation_mm, Some(2.0));
    }

    #[test]
    fn no_precipitation_objects_means_none() {
        let sample = forecast_entry(serde_json::json!({})).into_sample().unwrap();
        assert_eq!(sample.precipitation_mm, None);
        assert_eq!(sample.wind, None);
        assert_eq!(sample.timestamp(), 1_710_028_800);
        assert_eq!(sample.condition_main, "Rain");
    }

    #[test]
    fn empty_weather_array_is_a_schema_error() {
        let err = forecast_entry(serde_json::json!({ "weather": [] }))
            .into_sample()
            .unwrap_err();
        assert!(matches!(err, WeatherError::Schema { endpoint: Endpoint::Forecast, .. }));
    }

    #[test]
    fn wind_is_carried_over() {
        let sample = forecast_entry(serde_json::json!({ "wind": { "speed": 4.1, "deg": 250 } }))
            .into_sample()
            .unwrap();
        assert_eq!(sample.wind, Some(Wind { speed_ms: 4.1, direction_deg: 250.0 }));
    }

    #[test]
    fn truncate_long_bodies_on_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
