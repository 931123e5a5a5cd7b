use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::export::renderer::RenderError;
use crate::llm_client::LlmError;
use crate::models::resume::ModelError;
use crate::parser::ParseError;
use crate::store::repository::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Text generation service error: {0}")]
    Service(String),

    #[error("Text generation quota exhausted: {0}")]
    Quota(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("{} entries have no selected variation", .0.len())]
    IncompleteSelection(Vec<Uuid>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        if err.is_quota() {
            AppError::Quota(err.to_string())
        } else {
            AppError::Service(err.to_string())
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            corrupt @ StoreError::Corrupt { .. } => AppError::Internal(corrupt.into()),
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownVariation(..) => AppError::NotFound(err.to_string()),
            ModelError::EmptyText => AppError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Parse(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PARSE_ERROR",
                e.to_string(),
            ),
            AppError::Service(msg) => {
                tracing::error!("Text generation service error: {msg}");
                (StatusCode::BAD_GATEWAY, "SERVICE_ERROR", msg.clone())
            }
            AppError::Quota(msg) => {
                tracing::warn!("Text generation quota exhausted: {msg}");
                (StatusCode::TOO_MANY_REQUESTS, "QUOTA_ERROR", msg.clone())
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    e.to_string(),
                )
            }
            AppError::IncompleteSelection(ids) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INCOMPLETE_SELECTION",
                format!(
                    "Every entry needs exactly one selected variation before export. Missing: {}",
                    ids.iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ),
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
        };

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
    fn test_quota_llm_error_maps_to_quota() {
        let err: AppError = LlmError::Quota {
            message: "insufficient_quota".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Quota(_)));
    }

    #[test]
    fn test_api_llm_error_maps_to_service() {
        let err: AppError = LlmError::Api {
            status: 500,
            message: "upstream".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Service(_)));
    }

    #[test]
    fn test_model_errors_map_to_client_errors() {
        let unknown: AppError = ModelError::UnknownVariation(Uuid::new_v4(), Uuid::new_v4()).into();
        assert!(matches!(unknown, AppError::NotFound(_)));
        let empty: AppError = ModelError::EmptyText.into();
        assert!(matches!(empty, AppError::Validation(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Service("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Quota("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::Parse(ParseError::NoSections),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::IncompleteSelection(vec![Uuid::new_v4()]),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
