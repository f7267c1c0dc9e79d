//! Star schema the warehouse queries are written against.
//!
//! `fact_weather` holds one row per load of a city's daily reading and points
//! at `dim_location` and `dim_date` by surrogate key. Column constants carry
//! the table alias used in every query (`f`, `l`, `d`).

pub const LOCATION_TABLE: &str = "dim_location";
pub const DATE_TABLE: &str = "dim_date";
pub const FACT_TABLE: &str = "fact_weather";

pub const CITY: &str = "l.city";
pub const FULL_DATE: &str = "d.full_date";
pub const DAY_OF_WEEK: &str = "d.day_of_week";
pub const CALENDAR_MONTH: &str = "d.calendar_month";
pub const CALENDAR_YEAR: &str = "d.calendar_year";
pub const TEMPERATURE: &str = "f.temperature_2m";
pub const HUMIDITY: &str = "f.humidity_2m";
pub const LOADED_AT: &str = "f.loaded_at";

/// Fact rows joined to both dimensions.
pub fn fact_with_dimensions() -> String {
    format!(
        "{FACT_TABLE} f JOIN {DATE_TABLE} d ON f.date_key = d.date_key \
         JOIN {LOCATION_TABLE} l ON f.location_key = l.location_key"
    )
}

/// Fact rows joined to the location dimension only.
pub fn fact_with_location() -> String {
    format!("{FACT_TABLE} f JOIN {LOCATION_TABLE} l ON f.location_key = l.location_key")
}
