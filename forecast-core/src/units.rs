//! Temperature unit conversion and a few display helpers.
//!
//! Provider data always arrives in metric units and is stored as
//! [`Celsius`]. Converting is the last step before formatting, and
//! [`TemperatureUnit::convert`] returns a bare `f64`, so a converted value
//! cannot be fed back into a conversion.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::Celsius;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn convert(self, value: Celsius) -> f64 {
        convert(value.0, self)
    }

    /// Rounded display string, e.g. `"72°F"`.
    pub fn format(self, value: Celsius) -> String {
        // `+ 0.0` turns a rounded -0 into 0.
        format!("{}{}", self.convert(value).round() + 0.0, self.symbol())
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: c, f."
            )),
        }
    }
}

/// Convert a Celsius reading into `unit`.
pub fn convert(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub fn cm_from_mm(mm: f64) -> f64 {
    mm / 10.0
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass name for a meteorological wind direction in degrees.
pub fn compass_point(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5).round() as usize) % COMPASS.len();
    COMPASS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_and_boiling_points() {
        assert_eq!(convert(0.0, TemperatureUnit::Fahrenheit), 32.0);
        assert_eq!(convert(100.0, TemperatureUnit::Fahrenheit), 212.0);
        assert_eq!(convert(-40.0, TemperatureUnit::Fahrenheit), -40.0);
    }

    #[test]
    fn celsius_passes_through() {
        for value in [-12.5, 0.0, 21.3, 37.0] {
            assert_eq!(convert(value, TemperatureUnit::Celsius), value);
        }
    }

    #[test]
    fn format_rounds_and_appends_symbol() {
        assert_eq!(TemperatureUnit::Celsius.format(Celsius(21.6)), "22°C");
        assert_eq!(TemperatureUnit::Fahrenheit.format(Celsius(0.0)), "32°F");
        assert_eq!(TemperatureUnit::Celsius.format(Celsius(-0.2)), "0°C");
    }

    #[test]
    fn repeated_formatting_is_stable() {
        let reading = Celsius(18.0);
        let first = TemperatureUnit::Fahrenheit.format(reading);
        let second = TemperatureUnit::Fahrenheit.format(reading);
        assert_eq!(first, second);
        assert_eq!(first, "64°F");
    }

    #[test]
    fn toggle_flips_between_units() {
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.toggled().toggled(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn parse_unit_names() {
        assert_eq!("F".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!("celsius".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        let err = "kelvin".parse::<TemperatureUnit>().unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(200.0), "SSW");
        assert_eq!(compass_point(-90.0), "W");
    }

    #[test]
    fn millimetres_to_centimetres() {
        assert_eq!(cm_from_mm(2.0), 0.2);
    }
}
