//! Axum route handlers for the Enhancement API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enhance::enhancer::{enhance_entry, DEFAULT_COUNT};
use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::models::resume::Variation;
use crate::state::AppState;
use crate::store::{load_resume, persist};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(flatten)]
    pub job: JobDescription,
    /// 1-5, defaults to 3.
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub entry_id: Uuid,
    pub variations: Vec<Variation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/:id/entries/:entry_id/enhance
///
/// Body: `{"text": "<job description>", "company": "Acme", "count": 3}`.
/// New variations are stored unselected; pick one with the selection endpoint
/// or let the matcher choose.
pub async fn handle_enhance_entry(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EnhanceRequest>,
) -> Result<(StatusCode, Json<EnhanceResponse>), AppError> {
    // Reject before touching the store or the network.
    request.job.validate()?;

    let mut resume = load_resume(&state.db, id).await?;
    let variations = enhance_entry(
        state.llm.as_ref(),
        &mut resume,
        entry_id,
        &request.job,
        request.count.unwrap_or(DEFAULT_COUNT),
    )
    .await?;
    persist(&state.db, &mut resume).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnhanceResponse {
            entry_id,
            variations,
        }),
    ))
}
