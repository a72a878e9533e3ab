use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::agent::ProviderError;
use crate::extraction::{ExtractionError, GenerationError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to generate learning schedule: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Provider(e) => AppError::Provider(e),
            ExtractionError::Generation(e) => AppError::Generation(e),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Provider(e) => {
                tracing::error!("Provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    format!("The language model backend failed: {e}"),
                )
            }
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                if let GenerationError::Exhausted { history, .. } = e {
                    for attempt in history {
                        tracing::debug!(
                            "attempt {} raw output: {}",
                            attempt.index + 1,
                            attempt.raw_output
                        );
                    }
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    self.to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("job".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::ServiceUnavailable("no embeddings".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Provider(ProviderError::EmptyContent), StatusCode::BAD_GATEWAY),
            (
                AppError::Generation(GenerationError::MalformedShape { attempts: 3 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_generation_message_carries_detail() {
        let err = AppError::Generation(GenerationError::Exhausted {
            attempts: 2,
            detail: "attempt 1: list returned instead of an object".into(),
            history: Vec::new(),
        });
        let (_, code, message) = err.parts();
        assert_eq!(code, "GENERATION_ERROR");
        assert!(message.starts_with("Failed to generate learning schedule: "));
        assert!(message.contains("attempt 1"));
    }

    #[test]
    fn test_extraction_error_splits_by_kind() {
        let provider: AppError = ExtractionError::Provider(ProviderError::EmptyContent).into();
        assert!(matches!(provider, AppError::Provider(_)));

        let generation: AppError =
            ExtractionError::Generation(GenerationError::MalformedShape { attempts: 1 }).into();
        assert!(matches!(generation, AppError::Generation(_)));
    }

    #[test]
    fn test_database_detail_is_not_leaked() {
        let (_, _, message) = AppError::Database(sqlx::Error::PoolTimedOut).parts();
        assert_eq!(message, "A database error occurred");
    }
}
