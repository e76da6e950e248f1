use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortify_core::{ServiceError, ShortCodeError};
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    /// The path segment can never be a short code.
    MalformedShortCode(ShortCodeError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(ServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::NotFound(_)) | AppError::MalformedShortCode(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Service(ServiceError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            AppError::Service(ServiceError::Storage(_) | ServiceError::Cache(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<ShortCodeError> for AppError {
    fn from(e: ShortCodeError) -> Self {
        AppError::MalformedShortCode(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Service(e) => e.to_string(),
            AppError::MalformedShortCode(_) => "short code not found".to_string(),
        };

        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
