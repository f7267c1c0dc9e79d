use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use hyper::Method;
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use time::macros::offset;
use tower::ServiceExt;
use weather_api::{app, build_app_state, Error, Executor, Record, SeriesOptions, SqlQuery};

mock! {
    pub Warehouse {}

    #[async_trait]
    impl Executor for Warehouse {
        async fn execute(&self, query: &SqlQuery) -> Result<Vec<Record>, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(executor: Arc<dyn Executor>) -> TestApp {
    spawn_app_with_options(executor, SeriesOptions::default()).await
}

pub async fn spawn_app_with_options(
    executor: Arc<dyn Executor>,
    series_options: SeriesOptions,
) -> TestApp {
    let app_state = build_app_state(
        executor,
        series_options,
        offset!(+7),
        "./public-does-not-exist".to_string(),
    );
    TestApp {
        app: app(app_state),
    }
}

/// A warehouse that fails the test if it is ever queried.
pub fn untouched_warehouse() -> Arc<MockWarehouse> {
    let mut warehouse = MockWarehouse::new();
    warehouse.expect_execute().times(0);
    Arc::new(warehouse)
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.get(uri).await;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}
