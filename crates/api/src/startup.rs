use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use time::UtcOffset;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cities, compare, current, db, demo_cities, demo_compare, demo_current, demo_summary,
    demo_temperature, export_csv, routes, summary, temperature, CsvExport, ErrorBody, Executor,
    SeriesOptions, WeatherAccess,
};

#[derive(Clone)]
pub struct AppState {
    pub static_dir: String,
    pub weather_db: WeatherAccess,
    pub csv_export: CsvExport,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::weather::weather_routes::cities,
        routes::weather::weather_routes::current,
        routes::weather::weather_routes::temperature,
        routes::weather::weather_routes::summary,
        routes::weather::weather_routes::compare,
        routes::export::csv_download::export_csv,
        routes::demo::demo_routes::demo_cities,
        routes::demo::demo_routes::demo_current,
        routes::demo::demo_routes::demo_temperature,
        routes::demo::demo_routes::demo_summary,
        routes::demo::demo_routes::demo_compare,
    ),
    components(
        schemas(
                db::City,
                db::Reading,
                db::Summary,
                db::CityComparison,
                ErrorBody
            )
    ),
    tags(
        (name = "weather api", description = "a read-only RESTful api over the weather data warehouse")
    )
)]
struct ApiDoc;

pub fn build_app_state(
    executor: Arc<dyn Executor>,
    series_options: SeriesOptions,
    csv_offset: UtcOffset,
    static_dir: String,
) -> AppState {
    AppState {
        static_dir,
        weather_db: WeatherAccess::new(executor, series_options),
        csv_export: CsvExport::new(csv_offset),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let serve_static = ServeDir::new(&app_state.static_dir);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/api/cities", get(cities))
        .route("/api/current", get(current))
        .route("/api/temperature", get(temperature))
        .route("/api/summary", get(summary))
        .route("/api/compare", get(compare))
        .route("/api/export/csv", get(export_csv))
        // Synthetic data, no warehouse needed
        .route("/api/demo/cities", get(demo_cities))
        .route("/api/demo/current", get(demo_current))
        .route("/api/demo/temperature", get(demo_temperature))
        .route("/api/demo/data", get(demo_temperature))
        .route("/api/demo/summary", get(demo_summary))
        .route("/api/demo/compare", get(demo_compare))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .fallback_service(serve_static)
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
