//! Handler error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

/// Failure of an API request.
#[derive(Debug)]
pub enum ApiError {
    /// The request body is unusable. Answered with a plain-text detail.
    BadRequest(String),
    /// The datastore failed. Answered with `{title, detail}`.
    Unavailable(StoreError),
    /// Anything else on the server side.
    Internal(String),
}

#[derive(Serialize)]
struct Problem {
    title: &'static str,
    detail: String,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Unavailable(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail).into_response(),
            ApiError::Unavailable(err) => {
                error!(error = %err, "datastore failure");
                let body = Problem {
                    title: "Datastore unavailable",
                    detail: err.to_string(),
                };
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
            }
        }
    }
}
