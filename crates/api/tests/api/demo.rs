use crate::helpers::{spawn_app, untouched_warehouse};
use axum::http::StatusCode;
use serde_json::{json, Value};
use time::OffsetDateTime;

#[tokio::test]
async fn demo_cities_are_fixed() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/demo/cities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"city": "Hà Nội"},
            {"city": "Hồ Chí Minh"},
            {"city": "Đà Nẵng"},
            {"city": "Hải Phòng"},
            {"city": "Cần Thơ"}
        ])
    );
}

#[tokio::test]
async fn demo_series_covers_each_requested_day() {
    let test_app = spawn_app(untouched_warehouse()).await;

    for uri in [
        "/api/demo/temperature?from=2024-01-01&to=2024-01-03",
        "/api/demo/data?city=Anywhere&from=2024-01-01&to=2024-01-03",
    ] {
        let (status, body) = test_app.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");

        let readings = body.as_array().unwrap();
        let dates: Vec<&str> = readings
            .iter()
            .map(|r| r["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);

        for reading in readings {
            let temperature = reading["temperature"].as_f64().unwrap();
            let humidity = reading["humidity"].as_f64().unwrap();
            assert!((20.0..=35.0).contains(&temperature));
            assert!((50.0..=90.0).contains(&humidity));
        }
    }
}

#[tokio::test]
async fn demo_series_defaults_to_january_2024() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (_, body) = test_app.get_json("/api/demo/temperature").await;

    let readings = body.as_array().unwrap();
    assert_eq!(readings.len(), 31);
    assert_eq!(readings[30]["date"], "2024-01-31");
}

#[tokio::test]
async fn demo_current_is_for_today() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/demo/current?city=Hue").await;

    assert_eq!(status, StatusCode::OK);
    let today = OffsetDateTime::now_utc().date().to_string();
    assert_eq!(body["date"], Value::String(today));
    let temperature = body["temperature"].as_f64().unwrap();
    assert!((25.0..=35.0).contains(&temperature));
}

#[tokio::test]
async fn demo_summary_is_fixed() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/demo/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "days": 30,
            "avg_temp": 27.5,
            "min_temp": 20.1,
            "max_temp": 34.8,
            "avg_humidity": 75.2,
            "min_humidity": 52.3,
            "max_humidity": 89.7
        })
    );
}

#[tokio::test]
async fn demo_compare_answers_every_city() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/demo/compare?cities=Hue,Vinh").await;

    assert_eq!(status, StatusCode::OK);
    let cities: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["city"].as_str().unwrap())
        .collect();
    assert_eq!(cities, ["Hue", "Vinh"]);

    let (status, body) = test_app.get_json("/api/demo/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing cities query parameter"}));
}

#[tokio::test]
async fn api_docs_are_served() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let response = test_app.get("/docs").await;

    assert_eq!(response.status(), StatusCode::OK);
}
