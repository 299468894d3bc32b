//! Service error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors surfaced by the inventory service.
///
/// `NotFound` and `Validation` are expected request-level outcomes;
/// `Io` means the inventory document could not be written and is the only
/// variant that maps to a 500.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("storage failure")]
    Io(#[from] std::io::Error),

    #[error("malformed upload")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Io(source) => {
                tracing::error!("inventory write failed: {}", source);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure".to_string())
            }
            Error::Multipart(source) => {
                (StatusCode::BAD_REQUEST, format!("malformed upload: {}", source))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
