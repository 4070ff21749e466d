use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A temperature as reported by the provider (metric units).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_ms: f64,
    pub direction_deg: f64,
}

/// One provider data point, nominally 3 hours apart from its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature: Celsius,
    pub feels_like: Celsius,
    pub humidity_pct: u8,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub wind: Option<Wind>,
    /// Rain plus snow for the sample window; `None` when neither was reported.
    pub precipitation_mm: Option<f64>,
}

impl ForecastSample {
    pub fn timestamp(&self) -> i64 {
        self.time.timestamp()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature: Celsius,
    pub feels_like: Celsius,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub wind: Option<Wind>,
    pub visibility_m: Option<u32>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    /// Chronological.
    pub samples: Vec<ForecastSample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl CitySuggestion {
    /// "Springfield, Illinois, US", skipping empty parts.
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), Some(self.country.as_str())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_query(&self) -> LocationQuery {
        LocationQuery::new(&self.name, Some(&self.country))
    }
}

impl fmt::Display for CitySuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// What the user asked for: a city name with an optional country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub country: Option<String>,
}

impl LocationQuery {
    pub fn new(city: &str, country: Option<&str>) -> Self {
        Self {
            city: city.trim().to_string(),
            country: country
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    /// Provider `q` parameter: `city` or `city,country`.
    pub fn to_query(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.city, country),
            None => self.city.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_skips_missing_state() {
        let with_state = CitySuggestion {
            name: "Springfield".into(),
            country: "US".into(),
            state: Some("Illinois".into()),
        };
        let without = CitySuggestion { name: "Paris".into(), country: "FR".into(), state: None };

        assert_eq!(with_state.display_name(), "Springfield, Illinois, US");
        assert_eq!(without.display_name(), "Paris, FR");
    }

    #[test]
    fn display_name_skips_empty_country() {
        let free_text = CitySuggestion { name: "Oslo".into(), country: String::new(), state: None };
        assert_eq!(free_text.to_string(), "Oslo");
    }

    #[test]
    fn query_includes_country_when_present() {
        assert_eq!(LocationQuery::new(" London ", Some("GB")).to_query(), "London,GB");
        assert_eq!(LocationQuery::new("London", Some("  ")).to_query(), "London");
        assert_eq!(LocationQuery::new("London", None).to_query(), "London");
    }

    #[test]
    fn suggestion_query_uses_name_and_country() {
        let city = CitySuggestion {
            name: "Portland".into(),
            country: "US".into(),
            state: Some("Oregon".into()),
        };
        assert_eq!(city.to_query().to_query(), "Portland,US");
    }
}
