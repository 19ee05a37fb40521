//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use inventory_domain::error::{DecodeError, InventoryError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps handler failures to an HTTP response with appropriate status code.
pub enum ApiError {
    Inventory(InventoryError),
    /// The request body could not be read, e.g. it exceeds the body limit.
    Body(BytesRejection),
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self::Inventory(err)
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::Inventory(err.into())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Inventory(err) => err,
            Self::Body(rejection) => {
                tracing::debug!(error = %rejection, "failed to read request body");
                let body = ErrorBody {
                    error: rejection.body_text(),
                };
                return (rejection.status(), Json(body)).into_response();
            }
        };

        let status = match &err {
            InventoryError::Decode(err) => {
                tracing::debug!(error = %err, "rejected request payload");
                StatusCode::BAD_REQUEST
            }
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: err.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
