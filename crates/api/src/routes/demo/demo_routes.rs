use axum::Json;
use time::OffsetDateTime;

use crate::{
    db::{City, CityComparison, Reading, Summary},
    demo, ApiError, ErrorBody, WeatherQuery,
};

#[utoipa::path(
    get,
    path = "/api/demo/cities",
    responses((status = OK, description = "Fixed demo city list", body = Vec<City>)))]
pub async fn demo_cities() -> Json<Vec<City>> {
    Json(demo::cities())
}

#[utoipa::path(
    get,
    path = "/api/demo/current",
    params(
        ("city" = Option<String>, Query, description = "Accepted for parity with /api/current, not used"),
    ),
    responses((status = OK, description = "Synthetic reading for today", body = Reading)))]
pub async fn demo_current() -> Json<Reading> {
    Json(demo::current(OffsetDateTime::now_utc()))
}

/// Served at both `/api/demo/temperature` and `/api/demo/data`.
#[utoipa::path(
    get,
    path = "/api/demo/temperature",
    params(
        ("city" = Option<String>, Query, description = "Accepted for parity with /api/temperature, not used"),
        ("from" = Option<String>, Query, description = "First day, YYYY-MM-DD, defaults to 2024-01-01"),
        ("to" = Option<String>, Query, description = "Last day, YYYY-MM-DD, defaults to 2024-01-31"),
    ),
    responses(
        (status = OK, description = "One synthetic reading per day in the range", body = Vec<Reading>),
        (status = BAD_REQUEST, description = "Malformed date", body = ErrorBody)
    ))]
pub async fn demo_temperature(query: WeatherQuery) -> Json<Vec<Reading>> {
    Json(demo::series(query.range()))
}

#[utoipa::path(
    get,
    path = "/api/demo/summary",
    responses((status = OK, description = "Fixed demo summary", body = Summary)))]
pub async fn demo_summary() -> Json<Summary> {
    Json(demo::summary())
}

#[utoipa::path(
    get,
    path = "/api/demo/compare",
    params(
        ("cities" = String, Query, description = "Comma separated city names, or the key repeated once per city"),
    ),
    responses(
        (status = OK, description = "Synthetic averages for every requested city", body = Vec<CityComparison>),
        (status = BAD_REQUEST, description = "Missing cities", body = ErrorBody)
    ))]
pub async fn demo_compare(query: WeatherQuery) -> Result<Json<Vec<CityComparison>>, ApiError> {
    let cities = query.require_cities()?;
    Ok(Json(demo::compare(&cities)))
}
