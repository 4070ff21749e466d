//! City lookup against the provider's direct geocoding endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    client::{build_http_client, read_json},
    config::{ApiSettings, Config},
    error::{Endpoint, WeatherError},
    model::CitySuggestion,
};

/// Matches returned per query.
pub const SUGGESTION_LIMIT: usize = 5;

/// Source of city matches for a free-text query.
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct GeoClient {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    country: String,
    state: Option<String>,
    #[allow(dead_code)]
    lat: f64,
    #[allow(dead_code)]
    lon: f64,
}

impl GeoClient {
    pub fn new(settings: &ApiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            base_url: settings.geo_base_url.clone(),
            http: build_http_client(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self::new(&config.api_settings()?))
    }
}

#[async_trait]
impl CityLookup for GeoClient {
    async fn lookup(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
        let endpoint = Endpoint::Geocode;
        let url = format!("{}/direct", self.base_url);
        let limit = SUGGESTION_LIMIT.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let entries: Vec<GeoEntry> = read_json(endpoint, res).await?;

        Ok(entries
            .into_iter()
            .map(|e| CitySuggestion { name: e.name, country: e.country, state: e.state })
            .collect())
    }
}
