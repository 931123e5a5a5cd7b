use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use super::{parse_resume, DocumentFormat, ParseMethod};
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::state::AppState;
use crate::store::repository;

/// Upper bound on accepted resume files.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume: Resume,
    pub format: DocumentFormat,
    pub method: ParseMethod,
}

/// POST /api/v1/resumes/upload
///
/// Multipart fields: `file` (required, PDF or DOCX) and `ai_parse`
/// (optional, "true" to try AI structuring before the rule-based parser).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut ai_parse = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file data: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            "ai_parse" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid 'ai_parse' field: {e}")))?;
                ai_parse = parse_flag(&value)?;
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let ai = ai_parse.then(|| state.llm.as_ref());
    let outcome = parse_resume(&file_name, data, ai).await?;

    repository::save_resume(&state.db, &outcome.resume).await?;
    info!(
        "Stored resume {} from upload '{file_name}'",
        outcome.resume.id
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            resume: outcome.resume,
            format: outcome.format,
            method: outcome.method,
        }),
    ))
}

/// Accepts the usual form spellings of a boolean.
fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Validation(format!(
            "'ai_parse' must be true or false, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(" TRUE ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(matches!(parse_flag("maybe"), Err(AppError::Validation(_))));
    }
}
