use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct City {
    pub city: String,
}

/// One observation of a city: the shape of `/api/current` and each item of `/api/temperature`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Reading {
    /// Observation date, `YYYY-MM-DD`
    pub date: String,
    /// Temperature at 2m, °C
    #[serde(serialize_with = "shortest_opt")]
    pub temperature: Option<f64>,
    /// Relative humidity at 2m, percent
    #[serde(serialize_with = "shortest_opt")]
    pub humidity: Option<f64>,
    /// When the row was loaded into the warehouse
    pub loaded_at: Option<String>,
    /// Only selected when the extended series is enabled. `None` means the
    /// column was not selected, `Some(Value::Null)` a NULL in the warehouse.
    #[serde(
        default,
        deserialize_with = "selected",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub day_of_week: Option<Value>,
    #[serde(
        default,
        deserialize_with = "selected",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub calendar_month: Option<Value>,
    #[serde(
        default,
        deserialize_with = "selected",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub calendar_year: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Summary {
    pub days: i64,
    #[serde(serialize_with = "shortest")]
    pub avg_temp: f64,
    #[serde(serialize_with = "shortest")]
    pub min_temp: f64,
    #[serde(serialize_with = "shortest")]
    pub max_temp: f64,
    #[serde(serialize_with = "shortest")]
    pub avg_humidity: f64,
    #[serde(serialize_with = "shortest")]
    pub min_humidity: f64,
    #[serde(serialize_with = "shortest")]
    pub max_humidity: f64,
}

impl Summary {
    /// What a city or window without observations reports.
    pub fn empty() -> Self {
        Self {
            days: 0,
            avg_temp: 0.0,
            min_temp: 0.0,
            max_temp: 0.0,
            avg_humidity: 0.0,
            min_humidity: 0.0,
            max_humidity: 0.0,
        }
    }
}

/// Aggregate row as MySQL returns it: every aggregate but COUNT is NULL over an empty set.
#[derive(Deserialize, Debug)]
pub(crate) struct SummaryRow {
    pub days: i64,
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
}

impl From<SummaryRow> for Summary {
    fn from(row: SummaryRow) -> Self {
        if row.days == 0 {
            return Summary::empty();
        }
        Self {
            days: row.days,
            avg_temp: row.avg_temp.unwrap_or_default(),
            min_temp: row.min_temp.unwrap_or_default(),
            max_temp: row.max_temp.unwrap_or_default(),
            avg_humidity: row.avg_humidity.unwrap_or_default(),
            min_humidity: row.min_humidity.unwrap_or_default(),
            max_humidity: row.max_humidity.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CityComparison {
    pub city: String,
    #[serde(serialize_with = "shortest_opt")]
    pub avg_temp: Option<f64>,
    #[serde(serialize_with = "shortest_opt")]
    pub avg_humidity: Option<f64>,
}

/// A time-series row with its city, as written to the CSV export.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: String,
    pub city: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub loaded_at: Option<String>,
}

/// Largest magnitude below which every whole f64 is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole numbers go out as integers (`25`, `0`), everything else as floats.
fn shortest<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn shortest_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => shortest(value, serializer),
        None => serializer.serialize_none(),
    }
}

// Only runs when the key is present, so an explicit null stays `Some(Value::Null)`.
fn selected<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}
