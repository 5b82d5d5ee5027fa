use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Every failure a store-facing operation can surface. No variant is ever
/// retried automatically; each one maps to a different user-facing remedy.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing required field: {0}")]
    Validation(&'static str),

    #[error("kjo kohë sapo u rezervua nga dikush tjetër, ju lutem zgjidhni një orar tjetër")]
    Conflict,

    #[error("nuk keni të drejta administrimi, kontrolloni lejet e llogarisë")]
    Authorization,

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Authorization => StatusCode::FORBIDDEN,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Distinguish a uniqueness-constraint rejection from any other store
/// failure. The distinction changes the remedy: pick another slot versus
/// retry the same action.
pub fn map_store_error(e: rusqlite::Error) -> AppError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::Conflict
        }
        _ => AppError::Store(e),
    }
}
