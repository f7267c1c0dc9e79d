//! Synthetic data for running the API without a warehouse.
//!
//! Every generator returns the same types as [`WeatherAccess`](crate::WeatherAccess),
//! so demo responses are shaped exactly like real ones. Values are random within
//! fixed bands; nothing is stored between calls.

use rand::Rng;
use std::ops::RangeInclusive;
use time::{format_description::well_known::Rfc3339, macros::date, Date, Duration, OffsetDateTime};

use crate::db::{City, CityComparison, CityList, DateRange, Reading, Summary};

pub const CITIES: [&str; 5] = ["Hà Nội", "Hồ Chí Minh", "Đà Nẵng", "Hải Phòng", "Cần Thơ"];

pub const DEFAULT_FROM: Date = date!(2024 - 01 - 01);
pub const DEFAULT_TO: Date = date!(2024 - 01 - 31);

/// Upper bound on generated days per series request.
pub const MAX_SERIES_DAYS: usize = 3660;

pub const SERIES_TEMPERATURE: RangeInclusive<f64> = 20.0..=35.0;
pub const SERIES_HUMIDITY: RangeInclusive<f64> = 50.0..=90.0;
pub const CURRENT_TEMPERATURE: RangeInclusive<f64> = 25.0..=35.0;
pub const CURRENT_HUMIDITY: RangeInclusive<f64> = 60.0..=90.0;
pub const COMPARE_TEMPERATURE: RangeInclusive<f64> = 25.0..=33.0;
pub const COMPARE_HUMIDITY: RangeInclusive<f64> = 65.0..=90.0;

/// Readings are stamped as loaded this long after midnight of their date.
const LOAD_DELAY: Duration = Duration::hours(8);

pub fn cities() -> Vec<City> {
    CITIES
        .iter()
        .map(|city| City {
            city: city.to_string(),
        })
        .collect()
}

pub fn series(range: DateRange) -> Vec<Reading> {
    series_with_rng(range, &mut rand::thread_rng())
}

/// One reading per calendar day from `range.from` to `range.to`, both inclusive.
/// A reversed range yields nothing.
pub fn series_with_rng<R: Rng>(range: DateRange, rng: &mut R) -> Vec<Reading> {
    let from = range.from.unwrap_or(DEFAULT_FROM);
    let to = range.to.unwrap_or(DEFAULT_TO);

    let mut readings = Vec::new();
    let mut day = Some(from);
    while let Some(current) = day.filter(|d| *d <= to) {
        if readings.len() == MAX_SERIES_DAYS {
            break;
        }
        let loaded_at = (current.midnight().assume_utc() + LOAD_DELAY)
            .format(&Rfc3339)
            .ok();
        readings.push(Reading {
            date: current.to_string(),
            temperature: Some(rng.gen_range(SERIES_TEMPERATURE)),
            humidity: Some(rng.gen_range(SERIES_HUMIDITY)),
            loaded_at,
            day_of_week: None,
            calendar_month: None,
            calendar_year: None,
        });
        day = current.next_day();
    }
    readings
}

pub fn current(now: OffsetDateTime) -> Reading {
    let mut rng = rand::thread_rng();
    Reading {
        date: now.date().to_string(),
        temperature: Some(rng.gen_range(CURRENT_TEMPERATURE)),
        humidity: Some(rng.gen_range(CURRENT_HUMIDITY)),
        loaded_at: now.format(&Rfc3339).ok(),
        day_of_week: None,
        calendar_month: None,
        calendar_year: None,
    }
}

pub fn summary() -> Summary {
    Summary {
        days: 30,
        avg_temp: 27.5,
        min_temp: 20.1,
        max_temp: 34.8,
        avg_humidity: 75.2,
        min_humidity: 52.3,
        max_humidity: 89.7,
    }
}

/// Unlike the warehouse query, every requested city gets a row.
pub fn compare(cities: &CityList) -> Vec<CityComparison> {
    let mut rng = rand::thread_rng();
    cities
        .as_slice()
        .iter()
        .map(|city| CityComparison {
            city: city.clone(),
            avg_temp: Some(rng.gen_range(COMPARE_TEMPERATURE)),
            avg_humidity: Some(rng.gen_range(COMPARE_HUMIDITY)),
        })
        .collect()
}
