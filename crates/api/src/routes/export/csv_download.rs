use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
};
use hyper::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    HeaderMap,
};
use log::info;
use std::sync::Arc;

use crate::{
    csv_export::{attachment_disposition, CONTENT_TYPE as CSV_CONTENT_TYPE},
    AppState, ApiError, ErrorBody, WeatherQuery,
};

#[utoipa::path(
    get,
    path = "/api/export/csv",
    params(
        ("city" = String, Query, description = "City name as stored in the warehouse"),
        ("from" = Option<String>, Query, description = "First day to include, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Readings as a CSV attachment", content_type = "text/csv", body = String),
        (status = BAD_REQUEST, description = "Missing city or malformed date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to export data", body = ErrorBody)
    ))]
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    query: WeatherQuery,
) -> Result<(StatusCode, HeaderMap, String), ApiError> {
    let filter = query.require_city()?;
    let rows = state
        .weather_db
        .export_rows(&filter)
        .await
        .map_err(ApiError::data_source("Failed to export data"))?;

    let body = state.csv_export.render(&rows)?;
    info!("exporting {} row(s) for {}", rows.len(), filter.city);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&attachment_disposition(&filter.city))
            .map_err(|err| ApiError::Export(err.into()))?,
    );

    Ok((StatusCode::OK, headers, body))
}
