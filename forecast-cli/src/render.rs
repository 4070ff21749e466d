//! Plain-text views. Every temperature goes through `TemperatureUnit::format`
//! exactly once, here.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use forecast_core::{
    Backdrop, CurrentWeather, DayBucket, ForecastSample, ForecastView, TemperatureUnit,
    WeatherError, WeatherReport, daily_buckets_local, hourly, icon_for,
    units::{cm_from_mm, compass_point},
};

const BACKDROP_WIDTH: usize = 24;

pub fn report(report: &WeatherReport, unit: TemperatureUnit, view: ForecastView) -> String {
    let mut out = String::new();

    match &report.current {
        Ok(weather) => out.push_str(&current(weather, unit)),
        Err(err) => out.push_str(&error(err)),
    }
    out.push('\n');

    match (&report.forecast, view.day_limit()) {
        (Err(err), _) => out.push_str(&error(err)),
        (Ok(forecast), None) => out.push_str(&hourly_view(hourly(&forecast.samples), unit)),
        (Ok(forecast), Some(days)) => {
            out.push_str(&daily_view(&daily_buckets_local(&forecast.samples, days), unit))
        }
    }

    out
}

pub fn error(err: &WeatherError) -> String {
    format!("  ! {}\n", err.user_message())
}

pub fn current(weather: &CurrentWeather, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let icon = icon_for(&weather.condition_main);

    let _ = writeln!(out, "{}  {}", weather.location_name, icon.glyph());
    if let Some(backdrop) = Backdrop::for_description(&weather.condition_description) {
        let particles: String = std::iter::repeat_n(backdrop.particle(), BACKDROP_WIDTH)
            .map(|c| format!("{c} "))
            .collect();
        let _ = writeln!(out, "  {}", particles.trim_end());
    }
    let _ = writeln!(
        out,
        "  {}  {}",
        unit.format(weather.temperature),
        weather.condition_description
    );
    let _ = writeln!(out, "  Feels like   {}", unit.format(weather.feels_like));
    let _ = writeln!(out, "  Humidity     {}%", weather.humidity_pct);
    if let Some(wind) = weather.wind {
        let _ = writeln!(
            out,
            "  Wind         {:.1} m/s {}",
            wind.speed_ms,
            compass_point(wind.direction_deg)
        );
    }
    let _ = writeln!(out, "  Pressure     {} hPa", weather.pressure_hpa);
    if let Some(visibility) = weather.visibility_m {
        let _ = writeln!(out, "  Visibility   {:.1} km", f64::from(visibility) / 1000.0);
    }
    if let Some(mm) = weather.precipitation_mm {
        let _ = writeln!(out, "  Precip       {:.1} cm", cm_from_mm(mm));
    }
    let _ = writeln!(
        out,
        "  Sunrise      {}   Sunset {}",
        clock(weather.sunrise),
        clock(weather.sunset)
    );

    out
}

pub fn hourly_view(samples: &[ForecastSample], unit: TemperatureUnit) -> String {
    let mut out = String::from("Next 24 hours\n");
    if samples.is_empty() {
        out.push_str("  No forecast data available\n");
    }

    for sample in samples {
        let _ = writeln!(
            out,
            "  {}  {}  {:>5}  {:.1} mm  {}",
            clock(sample.time),
            icon_for(&sample.condition_main).glyph(),
            unit.format(sample.temperature),
            sample.precipitation_mm.unwrap_or(0.0),
            sample.condition_description
        );
    }

    out
}

pub fn daily_view(buckets: &[DayBucket], unit: TemperatureUnit) -> String {
    let mut out = format!("{}-Day Forecast\n", buckets.len());
    if buckets.is_empty() {
        out.push_str("  No forecast data available\n");
    }

    for day in buckets {
        let representative = day.representative();
        let _ = writeln!(
            out,
            "  {}  {}  H {:>5}  L {:>5}  {:.1} cm  {}%  {:.1} m/s  {}",
            day.date.format("%a %b %e"),
            icon_for(&representative.condition_main).glyph(),
            unit.format(day.high),
            unit.format(day.low),
            day.total_precipitation_cm,
            day.average_humidity_pct,
            day.max_wind_speed_ms,
            representative.condition_description
        );
    }

    out
}

fn clock(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M").to_string()
}
