//! Error types shared by the weather and geocoding clients.

use std::fmt;

pub use reqwest::StatusCode;
use thiserror::Error;

/// Provider endpoint an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
    Geocode,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current weather",
            Endpoint::Forecast => "forecast",
            Endpoint::Geocode => "geocoding",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required configuration value is absent. Never retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration value `{field}` (set it with `forecast configure` or the {env} environment variable)")]
    Missing {
        field: &'static str,
        env: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to send {endpoint} request: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected {endpoint} response: {detail}")]
    Schema { endpoint: Endpoint, detail: String },
}

impl WeatherError {
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Config(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Schema { endpoint, .. } => Some(*endpoint),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Message shown in place of data. Network and schema failures are
    /// deliberately indistinguishable to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.to_string(),
            _ => match self.endpoint() {
                Some(Endpoint::Forecast) => "Failed to load forecast data".to_string(),
                Some(Endpoint::Geocode) => "Failed to load city suggestions".to_string(),
                _ => "Failed to load weather data".to_string(),
            },
        }
    }
}
