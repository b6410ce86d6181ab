//! Error → HTTP response translation
//!
//! Every handler returns [`ApiError`]; [`error_response`] is the only place
//! that turns an error kind into a status code and wire body.
use axum::extract::rejection::{JsonRejection, StringRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dropstat_core::{DropError, ErrorCode};
use serde::{Deserialize, Serialize};

/// Replaces the message of service-side failures; details stay in the logs.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable, please try again later.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: ErrorCode,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub DropError);

impl From<DropError> for ApiError {
    fn from(err: DropError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DropError::Validation(rejection.body_text()))
    }
}

impl From<StringRejection> for ApiError {
    fn from(rejection: StringRejection) -> Self {
        ApiError(DropError::Validation(rejection.body_text()))
    }
}

pub fn error_response(err: &DropError) -> (StatusCode, Json<ErrorBody>) {
    if err.is_client_error() {
        tracing::info!(code = %err.code(), msg = err.message(), "request rejected");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error_code: err.code(),
                message: err.message().to_string(),
            }),
        );
    }

    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error_code: err.code(),
            message: SERVICE_UNAVAILABLE.to_string(),
        }),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self.0).into_response()
    }
}
