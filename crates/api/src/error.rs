use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{csv_export, db};

/// Body of every error response.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Missing {0} query parameter")]
    MissingParameter(&'static str),
    #[error("Invalid {0} query parameter, expected YYYY-MM-DD")]
    InvalidParameter(&'static str),
    #[error("Malformed query string")]
    MalformedQuery,
    /// The message is what the caller sees; `source` only reaches the logs.
    #[error("{message}")]
    DataSource {
        message: &'static str,
        #[source]
        source: db::Error,
    },
    #[error("Failed to export data")]
    Export(#[from] csv_export::Error),
}

impl ApiError {
    /// Logs the warehouse error and wraps it behind a stable message.
    pub fn data_source(message: &'static str) -> impl FnOnce(db::Error) -> ApiError {
        move |source| {
            error!("{}: {}", message, source);
            ApiError::DataSource { message, source }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::InvalidParameter(_)
            | ApiError::MalformedQuery => StatusCode::BAD_REQUEST,
            ApiError::DataSource { .. } | ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Export(err) = &self {
            error!("error exporting data: {}", err);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
