//! Axum route handlers for the Matcher API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::matcher::{match_resume, MatchOutcome};
use crate::models::job::JobDescription;
use crate::state::AppState;
use crate::store::{load_resume, persist};

/// POST /api/v1/resumes/:id/match
///
/// Body: `{"text": "<job description>", "company": "Acme"}`.
/// Selects the best variation of every entry, persists the selections and
/// returns them with a fit report.
pub async fn handle_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(jd): Json<JobDescription>,
) -> Result<Json<MatchOutcome>, AppError> {
    jd.validate()?;

    let mut resume = load_resume(&state.db, id).await?;
    let outcome = match_resume(state.selector.as_ref(), &mut resume, &jd).await?;
    persist(&state.db, &mut resume).await?;

    Ok(Json(outcome))
}
