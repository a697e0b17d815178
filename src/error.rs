use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure to materialize the movie table or the similarity matrix.
///
/// Fatal for the process: the service never starts with a partial catalog.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Schema mismatch: {0}")]
    Schema(String),

    #[error("Catalog load aborted: {0}")]
    Aborted(String),

    #[error("Movie table has {movies} rows but similarity matrix is {rows}x{rows}")]
    SizeMismatch { movies: usize, rows: usize },
}

/// Failure to resolve a recommendation request against the catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Movie not found: {0}")]
    TitleNotFound(String),

    #[error("Similarity row {0} is out of range")]
    RowOutOfRange(usize),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::TitleNotFound(_) => AppError::NotFound(err.to_string()),
            LookupError::RowOutOfRange(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_maps_to_not_found() {
        let err: AppError = LookupError::TitleNotFound("Heat".to_string()).into();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Movie not found: Heat"));
    }

    #[test]
    fn test_size_mismatch_message_names_both_sizes() {
        let err = LoadError::SizeMismatch { movies: 3, rows: 4 };
        assert_eq!(
            err.to_string(),
            "Movie table has 3 rows but similarity matrix is 4x4"
        );
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
