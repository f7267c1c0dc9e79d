use crate::helpers::{
    record, spawn_app, spawn_app_with_options, untouched_warehouse, MockWarehouse,
};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use weather_api::{Error, SeriesOptions};

#[tokio::test]
async fn cities_are_listed_from_the_location_dimension() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.sql.contains("DISTINCT") && query.params.is_empty())
        .times(1)
        .returning(|_| {
            Ok(vec![
                record(json!({"city": "Cần Thơ"})),
                record(json!({"city": "Hà Nội"})),
            ])
        });

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/cities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"city": "Cần Thơ"}, {"city": "Hà Nội"}]));
}

#[tokio::test]
async fn city_is_required_before_touching_the_warehouse() {
    let test_app = spawn_app(untouched_warehouse()).await;

    for uri in [
        "/api/current",
        "/api/temperature?from=2024-01-01",
        "/api/summary",
        "/api/current?city=",
    ] {
        let (status, body) = test_app.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"error": "Missing city query parameter"}), "{uri}");
    }
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app
        .get_json("/api/temperature?city=Hanoi&from=01/01/2024")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Invalid from query parameter, expected YYYY-MM-DD"})
    );
}

#[tokio::test]
async fn current_without_observations_is_null() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.params == ["Nowhere"] && query.sql.contains("LIMIT 1"))
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/current?city=Nowhere").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(null));
}

#[tokio::test]
async fn temperature_binds_city_and_range_in_order() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| {
            query.params == ["Hà Nội", "2024-01-01", "2024-01-31"]
                && !query.sql.contains("Hà Nội")
        })
        .times(1)
        .returning(|_| {
            Ok(vec![record(json!({
                "date": "2024-01-01",
                "temperature": 18.4,
                "humidity": null,
                "loaded_at": "2024-01-02T03:00:00Z"
            }))])
        });

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app
        .get_json("/api/temperature?city=H%C3%A0%20N%E1%BB%99i&from=2024-01-01&to=2024-01-31")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "date": "2024-01-01",
            "temperature": 18.4,
            "humidity": null,
            "loaded_at": "2024-01-02T03:00:00Z"
        }])
    );
}

#[tokio::test]
async fn summary_of_nothing_is_zero_filled() {
    let mut warehouse = MockWarehouse::new();
    warehouse.expect_execute().times(1).returning(|_| {
        Ok(vec![record(json!({
            "days": 0,
            "avg_temp": null,
            "min_temp": null,
            "max_temp": null,
            "avg_humidity": null,
            "min_humidity": null,
            "max_humidity": null
        }))])
    });

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app
        .get_json("/api/summary?city=Hanoi&from=2030-01-01&to=2030-01-31")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "days": 0,
            "avg_temp": 0,
            "min_temp": 0,
            "max_temp": 0,
            "avg_humidity": 0,
            "min_humidity": 0,
            "max_humidity": 0
        })
    );
}

#[tokio::test]
async fn compare_leaves_out_cities_without_data() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.params == ["A", "B"] && query.sql.contains("GROUP BY"))
        .times(1)
        .returning(|_| {
            Ok(vec![record(json!({
                "city": "A",
                "avg_temp": 26.5,
                "avg_humidity": 71.25
            }))])
        });

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/compare?cities=A,B").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"city": "A", "avg_temp": 26.5, "avg_humidity": 71.25}])
    );
}

#[tokio::test]
async fn compare_accepts_repeated_keys() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.params == ["A", "B"])
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/compare?cities=A&cities=B").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn compare_requires_cities() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/compare").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing cities query parameter"}));
}

#[tokio::test]
async fn warehouse_failures_keep_their_detail_out_of_the_response() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .times(1)
        .returning(|_| Err(Error::Query(sqlx::Error::PoolTimedOut)));

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/temperature?city=Hanoi").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch weather data"}));
}

#[tokio::test]
async fn configured_series_limit_caps_the_query() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| {
            let sql = query.positional_sql();
            sql.contains("ORDER BY d.full_date") && sql.contains("LIMIT 2")
        })
        .times(2)
        .returning(|_| Ok(vec![]));

    let options = SeriesOptions {
        limit: Some(2),
        extended: false,
    };
    let test_app = spawn_app_with_options(Arc::new(warehouse), options).await;

    let (status, body) = test_app.get_json("/api/temperature?city=Hanoi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let response = test_app.get("/api/export/csv?city=Hanoi").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn extended_series_keeps_null_date_attributes() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.sql.contains("d.day_of_week"))
        .times(1)
        .returning(|_| {
            Ok(vec![record(json!({
                "date": "2024-01-01",
                "temperature": 21.5,
                "humidity": 80.0,
                "loaded_at": null,
                "day_of_week": null,
                "calendar_month": 1,
                "calendar_year": 2024
            }))])
        });

    let options = SeriesOptions {
        limit: None,
        extended: true,
    };
    let test_app = spawn_app_with_options(Arc::new(warehouse), options).await;
    let (status, body) = test_app.get_json("/api/temperature?city=Hanoi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "date": "2024-01-01",
            "temperature": 21.5,
            "humidity": 80,
            "loaded_at": null,
            "day_of_week": null,
            "calendar_month": 1,
            "calendar_year": 2024
        }])
    );
}
