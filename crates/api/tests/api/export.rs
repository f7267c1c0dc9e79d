use crate::helpers::{record, spawn_app, untouched_warehouse, MockWarehouse};
use axum::{body::to_bytes, http::StatusCode};
use hyper::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde_json::json;
use std::sync::Arc;
use weather_api::Error;

#[tokio::test]
async fn export_is_a_csv_attachment() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .withf(|query| query.params == ["Hà Nội", "2024-01-01"])
        .times(1)
        .returning(|_| {
            Ok(vec![
                record(json!({
                    "date": "2024-01-01",
                    "city": "Hà Nội",
                    "temperature": 25.5,
                    "humidity": 70.2,
                    "loaded_at": "2024-01-01T01:00:00Z"
                })),
                record(json!({
                    "date": "2024-01-02",
                    "city": "Hà Nội",
                    "temperature": null,
                    "humidity": 68.0,
                    "loaded_at": null
                })),
            ])
        });

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let response = test_app
        .get("/api/export/csv?city=H%C3%A0%20N%E1%BB%99i&from=2024-01-01")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"weather_data_H__N_i.csv\"; \
         filename*=UTF-8''weather_data_H%C3%A0%20N%E1%BB%99i.csv"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(
        csv,
        "Ngày,Thành phố,Nhiệt độ (°C),Độ ẩm (%),Thời gian cập nhật\n\
         \"1/1/2024\",\"Hà Nội\",\"25.5\",\"70.2\",\"08:00:00 1/1/2024\"\n\
         \"2/1/2024\",\"Hà Nội\",\"N/A\",\"68\",\"N/A\"\n"
    );
}

#[tokio::test]
async fn export_without_rows_is_header_only() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let response = test_app.get("/api/export/csv?city=Hue").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(body.to_vec()).unwrap(),
        "Ngày,Thành phố,Nhiệt độ (°C),Độ ẩm (%),Thời gian cập nhật\n"
    );
}

#[tokio::test]
async fn export_requires_city() {
    let test_app = spawn_app(untouched_warehouse()).await;

    let (status, body) = test_app.get_json("/api/export/csv?from=2024-01-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing city query parameter"}));
}

#[tokio::test]
async fn export_failure_is_reported_as_json() {
    let mut warehouse = MockWarehouse::new();
    warehouse
        .expect_execute()
        .times(1)
        .returning(|_| Err(Error::Query(sqlx::Error::PoolClosed)));

    let test_app = spawn_app(Arc::new(warehouse)).await;
    let (status, body) = test_app.get_json("/api/export/csv?city=Hue").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to export data"}));
}
