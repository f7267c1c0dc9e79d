use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    db::{City, CityComparison, Reading, Summary},
    AppState, ApiError, ErrorBody, WeatherQuery,
};

#[utoipa::path(
    get,
    path = "/api/cities",
    responses(
        (status = OK, description = "Every city in the location dimension, alphabetically", body = Vec<City>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to fetch cities", body = ErrorBody)
    ))]
pub async fn cities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<City>>, ApiError> {
    let cities = state
        .weather_db
        .cities()
        .await
        .map_err(ApiError::data_source("Failed to fetch cities"))?;
    Ok(Json(cities))
}

#[utoipa::path(
    get,
    path = "/api/current",
    params(
        ("city" = String, Query, description = "City name as stored in the warehouse"),
    ),
    responses(
        (status = OK, description = "Most recent reading for the city, or null when it has none", body = Option<Reading>),
        (status = BAD_REQUEST, description = "Missing city", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to fetch current weather data", body = ErrorBody)
    ))]
pub async fn current(
    State(state): State<Arc<AppState>>,
    query: WeatherQuery,
) -> Result<Json<Option<Reading>>, ApiError> {
    let filter = query.require_city()?;
    let reading = state
        .weather_db
        .current(&filter.city)
        .await
        .map_err(ApiError::data_source("Failed to fetch current weather data"))?;
    Ok(Json(reading))
}

#[utoipa::path(
    get,
    path = "/api/temperature",
    params(
        ("city" = String, Query, description = "City name as stored in the warehouse"),
        ("from" = Option<String>, Query, description = "First day to include, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Daily readings in date order", body = Vec<Reading>),
        (status = BAD_REQUEST, description = "Missing city or malformed date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to fetch weather data", body = ErrorBody)
    ))]
pub async fn temperature(
    State(state): State<Arc<AppState>>,
    query: WeatherQuery,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let filter = query.require_city()?;
    let readings = state
        .weather_db
        .series(&filter)
        .await
        .map_err(ApiError::data_source("Failed to fetch weather data"))?;
    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/summary",
    params(
        ("city" = String, Query, description = "City name as stored in the warehouse"),
        ("from" = Option<String>, Query, description = "First day to include, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Count, average, min and max of temperature and humidity; zero-filled when nothing matches", body = Summary),
        (status = BAD_REQUEST, description = "Missing city or malformed date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to fetch summary data", body = ErrorBody)
    ))]
pub async fn summary(
    State(state): State<Arc<AppState>>,
    query: WeatherQuery,
) -> Result<Json<Summary>, ApiError> {
    let filter = query.require_city()?;
    let summary = state
        .weather_db
        .summary(&filter)
        .await
        .map_err(ApiError::data_source("Failed to fetch summary data"))?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/compare",
    params(
        ("cities" = String, Query, description = "Comma separated city names, or the key repeated once per city"),
    ),
    responses(
        (status = OK, description = "Average temperature and humidity per city; cities without data are left out", body = Vec<CityComparison>),
        (status = BAD_REQUEST, description = "Missing cities", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to fetch comparison data", body = ErrorBody)
    ))]
pub async fn compare(
    State(state): State<Arc<AppState>>,
    query: WeatherQuery,
) -> Result<Json<Vec<CityComparison>>, ApiError> {
    let cities = query.require_cities()?;
    let comparison = state
        .weather_db
        .compare(&cities)
        .await
        .map_err(ApiError::data_source("Failed to fetch comparison data"))?;
    Ok(Json(comparison))
}
