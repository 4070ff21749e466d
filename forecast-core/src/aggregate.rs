//! Groups the flat 3-hourly forecast list into calendar days.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, TimeZone};

use crate::model::{Celsius, ForecastSample};
use crate::units::cm_from_mm;

/// Samples shown by the hourly view: the next 24 hours at 3-hour spacing.
pub const HOURLY_SAMPLES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastView {
    #[default]
    Hourly,
    ThreeDay,
    FiveDay,
}

impl ForecastView {
    /// Number of day buckets the view shows; `None` for the hourly view.
    pub fn day_limit(&self) -> Option<usize> {
        match self {
            ForecastView::Hourly => None,
            ForecastView::ThreeDay => Some(3),
            ForecastView::FiveDay => Some(5),
        }
    }
}

/// Samples sharing one local calendar date, with derived statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    samples: Vec<ForecastSample>,
    pub high: Celsius,
    pub low: Celsius,
    pub total_precipitation_cm: f64,
    pub average_humidity_pct: u8,
    pub max_wind_speed_ms: f64,
}

impl DayBucket {
    fn from_samples(date: NaiveDate, samples: Vec<ForecastSample>) -> Self {
        let temperatures = samples.iter().map(|s| s.temperature.0);
        let high = temperatures.clone().fold(f64::NEG_INFINITY, f64::max);
        let low = temperatures.fold(f64::INFINITY, f64::min);

        let total_mm: f64 = samples.iter().filter_map(|s| s.precipitation_mm).sum();

        let humidity_sum: u32 = samples.iter().map(|s| u32::from(s.humidity_pct)).sum();
        let average_humidity = (f64::from(humidity_sum) / samples.len() as f64).round();

        let max_wind = samples
            .iter()
            .filter_map(|s| s.wind.map(|w| w.speed_ms))
            .fold(0.0, f64::max);

        Self {
            date,
            high: Celsius(high),
            low: Celsius(low),
            total_precipitation_cm: cm_from_mm(total_mm),
            average_humidity_pct: average_humidity as u8,
            max_wind_speed_ms: max_wind,
            samples,
        }
    }

    /// Time-ascending; never empty.
    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    /// The middle sample (index `len / 2`), used for the day's condition.
    pub fn representative(&self) -> &ForecastSample {
        &self.samples[self.samples.len() / 2]
    }
}

/// Buckets `samples` by their calendar date in `tz` and returns at most
/// `days` buckets, in order of first appearance. The first bucket is partial
/// when the provider window starts mid-day.
pub fn daily_buckets<Tz: TimeZone>(
    samples: &[ForecastSample],
    days: usize,
    tz: &Tz,
) -> Vec<DayBucket> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut grouped: HashMap<NaiveDate, Vec<ForecastSample>> = HashMap::new();

    for sample in samples {
        let date = sample.time.with_timezone(tz).date_naive();
        grouped
            .entry(date)
            .or_insert_with(|| {
                order.push(date);
                Vec::new()
            })
            .push(sample.clone());
    }

    order
        .into_iter()
        .take(days)
        .filter_map(|date| grouped.remove(&date).map(|s| DayBucket::from_samples(date, s)))
        .collect()
}

/// [`daily_buckets`] using the machine's local day boundary.
pub fn daily_buckets_local(samples: &[ForecastSample], days: usize) -> Vec<DayBucket> {
    daily_buckets(samples, days, &Local)
}

pub fn hourly(samples: &[ForecastSample]) -> &[ForecastSample] {
    &samples[..samples.len().min(HOURLY_SAMPLES)]
}
