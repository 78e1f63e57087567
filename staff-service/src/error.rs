use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use shared::responses::ErrorResponse;
use thiserror::Error;

// Staff Service Error
#[derive(Debug, Error)]
pub enum StaffServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation Failed: {0}")]
    Validation(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Report Error: {0}")]
    Report(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for StaffServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for StaffServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for StaffServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for StaffServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            // Duplicate ids are reported as 400 to keep the existing client contract.
            Self::Conflict(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Validation(message) | Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            Self::Report(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render the staff report.".into(),
            ),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Oof, Something went wrong while accessing the database.".into(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Server error");
        } else {
            tracing::warn!(error = %self, %status, "Client error");
        }

        (status, axum::Json(ErrorResponse::new(message))).into_response()
    }
}
