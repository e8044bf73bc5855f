use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unsupported file format: {0:?} (expected gpx or tcx)")]
    UnsupportedFormat(String),
    #[error("Malformed track: {0}")]
    MalformedTrack(String),
}

impl ParseError {
    pub(crate) fn missing(index: usize, field: &str) -> Self {
        ParseError::MalformedTrack(format!("point {} is missing {}", index, field))
    }

    pub(crate) fn invalid(index: usize, field: &str, value: &str) -> Self {
        ParseError::MalformedTrack(format!("point {} has invalid {}: {:?}", index, field, value))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Track contains no points")]
    EmptyTrack,
    #[error("Insufficient rows for speed window (need {window}, got {rows})")]
    InsufficientWindow { rows: usize, window: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("No {table} entry brackets {value}")]
    NoReferenceMatch { table: &'static str, value: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Failed to read reference table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid reference table {name}: {source}")]
    Json {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error("Ride session not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Parse(_) | AppError::Summary(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Reference(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
