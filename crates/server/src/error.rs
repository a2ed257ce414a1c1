use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use puzzle_engine::{CatalogError, CatalogLoadError, EngineError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Puzzle source unavailable: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl From<CatalogLoadError> for AppError {
    fn from(e: CatalogLoadError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::NoPuzzleLoaded | EngineError::SessionFinished(_) => {
                AppError::Conflict(e.to_string())
            }
            EngineError::PuzzleData(_) | EngineError::Rules(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::warn!("Catalog load failed: {msg}");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_engine::{Phase, PuzzleDataError};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(CatalogError::EmptyCatalog), StatusCode::NOT_FOUND),
            (
                AppError::from(EngineError::SessionFinished(Phase::Solved)),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(EngineError::PuzzleData(PuzzleDataError::EmptySolution)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(CatalogLoadError::Malformed("bad".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
