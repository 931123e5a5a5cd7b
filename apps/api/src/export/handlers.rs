//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::export_resume;
use crate::export::theme::{list_themes, ExportFormat, Theme, ThemeInfo};
use crate::state::AppState;
use crate::store::load_resume;

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportRequest {
    /// Empty bodies take the defaults; anything else must be valid JSON.
    fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("invalid export request: {e}")))
    }
}

/// GET /api/v1/themes
pub async fn handle_list_themes() -> Json<Vec<ThemeInfo>> {
    Json(list_themes())
}

/// POST /api/v1/resumes/:id/export
///
/// Body: `{"theme": "professional", "format": "pdf"}` (both optional; an
/// empty body exports a professional PDF).
/// Responds with the document bytes as an attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = ExportRequest::from_body(&body)?;
    let resume = load_resume(&state.db, id).await?;
    let artifact =
        export_resume(state.renderer.as_ref(), &resume, request.theme, request.format).await?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(artifact.content),
    )
        .into_response())
}
