//! HTTP mapping of the external error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use auraxmap::query::QueryError;

/// JSON error body returned to clients.
///
/// `error` is the stable machine-readable kind; `detail` is a
/// human-readable message and may change between versions.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

/// Response-convertible wrapper for [`QueryError`].
#[derive(Debug)]
pub struct ApiError(pub QueryError);

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        let body = ErrorBody {
            error: self.0.kind(),
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
