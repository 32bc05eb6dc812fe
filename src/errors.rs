use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::DraftField;
use crate::services::gate::LOGIN_PATH;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials or user not found")]
    InvalidCredentials,

    #[error("Email and Password are required")]
    MissingCredentials,

    #[error("identity service unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("missing required fields: {}", join_fields(.0))]
    ValidationFailed(Vec<DraftField>),

    #[error("unauthorized")]
    Unauthorized,

    #[error("configuration error: {0}")]
    Config(String),
}

fn join_fields(fields: &[DraftField]) -> String {
    fields.iter().map(DraftField::as_str).collect::<Vec<_>>().join(", ")
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::MissingCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::IdentityUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Unauthorized => {
                serde_json::json!({ "error": self.to_string(), "redirect": LOGIN_PATH })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
