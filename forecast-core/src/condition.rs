//! Mapping from provider condition names to display icons.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Sun,
    CloudSun,
    Cloud,
    CloudDrizzle,
    CloudRain,
    CloudLightning,
    Snowflake,
    CloudFog,
    Wind,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::CloudSun => "cloud-sun",
            Icon::Cloud => "cloud",
            Icon::CloudDrizzle => "cloud-drizzle",
            Icon::CloudRain => "cloud-rain",
            Icon::CloudLightning => "cloud-lightning",
            Icon::Snowflake => "snowflake",
            Icon::CloudFog => "cloud-fog",
            Icon::Wind => "wind",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "☀️",
            Icon::CloudSun => "⛅",
            Icon::Cloud => "☁️",
            Icon::CloudDrizzle => "🌦️",
            Icon::CloudRain => "🌧️",
            Icon::CloudLightning => "⛈️",
            Icon::Snowflake => "❄️",
            Icon::CloudFog => "🌫️",
            Icon::Wind => "🌬️",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized provider condition (`weather[].main`) to icon.
pub const CONDITION_ICONS: &[(&str, Icon)] = &[
    ("clear", Icon::Sun),
    ("clouds", Icon::Cloud),
    ("drizzle", Icon::CloudDrizzle),
    ("rain", Icon::CloudRain),
    ("thunderstorm", Icon::CloudLightning),
    ("snow", Icon::Snowflake),
    ("mist", Icon::CloudFog),
    ("fog", Icon::CloudFog),
    ("haze", Icon::CloudFog),
    ("smoke", Icon::CloudFog),
    ("dust", Icon::CloudFog),
    ("sand", Icon::CloudFog),
    ("ash", Icon::CloudFog),
    ("squall", Icon::Wind),
    ("tornado", Icon::Wind),
];

pub const FALLBACK_ICON: Icon = Icon::CloudSun;

pub fn icon_for(condition_main: &str) -> Icon {
    let normalized = condition_main.trim().to_lowercase();
    CONDITION_ICONS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON)
}

/// Falling-particle effect drawn behind the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Snow,
    Rain,
}

impl Backdrop {
    /// Picks an effect from the free-text description ("light snow",
    /// "shower rain", ...). Snow wins over rain.
    pub fn for_description(description: &str) -> Option<Self> {
        let normalized = description.to_lowercase();
        if normalized.contains("snow") {
            Some(Backdrop::Snow)
        } else if ["rain", "drizzle", "shower"].iter().any(|w| normalized.contains(w)) {
            Some(Backdrop::Rain)
        } else {
            None
        }
    }

    pub fn particle(&self) -> char {
        match self {
            Backdrop::Snow => '*',
            Backdrop::Rain => '\'',
        }
    }
}
