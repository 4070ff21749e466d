use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use forecast_core::{
    Config, ForecastView, GeoClient, LocationQuery, SuggestionClient, TemperatureUnit,
    WeatherClient,
    config::{DEFAULT_GEO_BASE_URL, DEFAULT_WEATHER_BASE_URL},
};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::{render, search};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Current weather and multi-day forecasts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and provider URLs.
    Configure,

    /// Show current weather and a forecast for a city.
    Show {
        /// City name.
        city: String,

        /// Optional country code used to disambiguate, e.g. "GB".
        #[arg(long)]
        country: Option<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Search for a city interactively, then show its weather.
    Search {
        #[command(flatten)]
        display: DisplayArgs,
    },

    /// List cities matching a partial name.
    Suggest {
        /// At least two characters.
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Temperature unit: c or f. Defaults to the configured unit.
    #[arg(long, short, value_parser = parse_unit)]
    unit: Option<TemperatureUnit>,

    /// Forecast layout.
    #[arg(long, value_enum, default_value_t = ViewArg::Hourly)]
    view: ViewArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Hourly,
    #[value(name = "3day")]
    ThreeDay,
    #[value(name = "5day")]
    FiveDay,
}

impl From<ViewArg> for ForecastView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Hourly => ForecastView::Hourly,
            ViewArg::ThreeDay => ForecastView::ThreeDay,
            ViewArg::FiveDay => ForecastView::FiveDay,
        }
    }
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}

impl DisplayArgs {
    fn unit_or(&self, config: &Config) -> TemperatureUnit {
        self.unit.unwrap_or(config.default_unit)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, country, display } => {
                let config = Config::load()?;
                let query = LocationQuery::new(&city, country.as_deref());
                show(&config, &query, &display).await
            }
            Command::Search { display } => {
                let config = Config::load()?;
                let geo = GeoClient::from_config(&config)?;
                let query = search::prompt_for_city(geo).await?;
                show(&config, &query, &display).await
            }
            Command::Suggest { query } => {
                let config = Config::load()?;
                let suggestions = SuggestionClient::new(GeoClient::from_config(&config)?)
                    .suggest(&query)
                    .await;

                if suggestions.is_empty() {
                    println!("No matching cities.");
                }
                for city in suggestions {
                    println!("{city}");
                }
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, query: &LocationQuery, display: &DisplayArgs) -> anyhow::Result<()> {
    let client = WeatherClient::from_config(config)?;
    let report = client.report(query).await;

    for err in [report.current.as_ref().err(), report.forecast.as_ref().err()]
        .into_iter()
        .flatten()
    {
        tracing::debug!("lookup for {} failed: {}", query.to_query(), err);
    }

    print!("{}", render::report(&report, display.unit_or(config), display.view.into()));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?.with_defaults_for_missing_urls();

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.api_key = Some(api_key.trim().to_string());
    }

    let weather_base_url = Text::new("Weather API base URL:")
        .with_default(cfg.weather_base_url.as_deref().unwrap_or(DEFAULT_WEATHER_BASE_URL))
        .prompt()
        .context("Failed to read weather API base URL")?;
    let geo_base_url = Text::new("Geocoding API base URL:")
        .with_default(cfg.geo_base_url.as_deref().unwrap_or(DEFAULT_GEO_BASE_URL))
        .prompt()
        .context("Failed to read geocoding API base URL")?;
    cfg.weather_base_url = Some(weather_base_url);
    cfg.geo_base_url = Some(geo_base_url);

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == cfg.default_unit).unwrap_or(0);
    cfg.default_unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read temperature unit")?;

    if let Err(err) = cfg.api_settings() {
        println!("Warning: {err}");
    }

    cfg.save_to(&path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_unit_and_view() {
        let cli = Cli::try_parse_from([
            "forecast", "show", "London", "--country", "GB", "--unit", "f", "--view", "3day",
        ])
        .unwrap();

        match cli.command {
            Command::Show { city, country, display } => {
                assert_eq!(city, "London");
                assert_eq!(country.as_deref(), Some("GB"));
                assert_eq!(display.unit, Some(TemperatureUnit::Fahrenheit));
                assert_eq!(ForecastView::from(display.view), ForecastView::ThreeDay);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn view_defaults_to_hourly_and_unit_to_config() {
        let cli = Cli::try_parse_from(["forecast", "search"]).unwrap();
        let Command::Search { display } = cli.command else {
            panic!("expected search");
        };

        let config = Config { default_unit: TemperatureUnit::Fahrenheit, ..Config::default() };
        assert_eq!(display.view, ViewArg::Hourly);
        assert_eq!(display.unit_or(&config), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = Cli::try_parse_from(["forecast", "show", "Oslo", "--unit", "k"]).unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }
}
