use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::repository::{self, ResumeSummary};
use super::{load_resume, persist};
use crate::errors::AppError;
use crate::models::resume::{
    ContactInfo, Entry, EntryContext, EntryKind, Resume, Variation, VariationSource,
};
use crate::state::AppState;

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(repository::list_resumes(&state.db).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(load_resume(&state.db, id).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::delete_resume(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// Partial contact update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

impl ContactPatch {
    fn apply(self, contact: &mut ContactInfo) {
        let fields = [
            (&mut contact.name, self.name),
            (&mut contact.title, self.title),
            (&mut contact.email, self.email),
            (&mut contact.phone, self.phone),
            (&mut contact.location, self.location),
            (&mut contact.linkedin, self.linkedin),
            (&mut contact.github, self.github),
            (&mut contact.website, self.website),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        }
    }
}

/// PATCH /api/v1/resumes/:id/contact
pub async fn handle_update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<Resume>, AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    patch.apply(&mut resume.contact);
    if !resume.contact.name.is_empty() {
        resume.name = resume.contact.name.clone();
    }
    persist(&state.db, &mut resume).await?;
    Ok(Json(resume))
}

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    pub kind: EntryKind,
    pub text: String,
    #[serde(default)]
    pub context: Option<EntryContext>,
}

/// POST /api/v1/resumes/:id/sections/:section_id/entries
/// The new entry gets one `user` variation, selected.
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("entry text cannot be empty".to_string()));
    }
    let mut resume = load_resume(&state.db, id).await?;
    let section = resume
        .section_mut(section_id)
        .ok_or_else(|| AppError::NotFound(format!("Section {section_id} not found")))?;

    let mut entry = Entry::from_text(req.kind, req.context, &req.text);
    for variation in &mut entry.variations {
        variation.source = VariationSource::User;
    }
    section.entries.push(entry.clone());

    persist(&state.db, &mut resume).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/resumes/:id/entries/:entry_id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    resume
        .remove_entry(entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;
    persist(&state.db, &mut resume).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct NewVariationRequest {
    pub text: String,
    #[serde(default)]
    pub select: bool,
}

/// POST /api/v1/resumes/:id/entries/:entry_id/variations
pub async fn handle_add_variation(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<NewVariationRequest>,
) -> Result<(StatusCode, Json<Variation>), AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    let entry = entry_mut(&mut resume, entry_id)?;

    let variation = Variation::new(req.text.trim(), VariationSource::User);
    let variation_id = entry.add_variation(variation.clone())?;
    if req.select {
        entry.select(variation_id)?;
    }

    persist(&state.db, &mut resume).await?;
    Ok((StatusCode::CREATED, Json(variation)))
}

#[derive(Debug, Deserialize)]
pub struct EditVariationRequest {
    pub text: String,
}

/// PATCH /api/v1/resumes/:id/entries/:entry_id/variations/:variation_id
pub async fn handle_edit_variation(
    State(state): State<AppState>,
    Path((id, entry_id, variation_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<EditVariationRequest>,
) -> Result<Json<Variation>, AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    let entry = entry_mut(&mut resume, entry_id)?;
    entry.edit_variation(variation_id, &req.text)?;
    let edited = entry
        .variation(variation_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Variation {variation_id} not found")))?;

    persist(&state.db, &mut resume).await?;
    Ok(Json(edited))
}

/// DELETE /api/v1/resumes/:id/entries/:entry_id/variations/:variation_id
pub async fn handle_delete_variation(
    State(state): State<AppState>,
    Path((id, entry_id, variation_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    entry_mut(&mut resume, entry_id)?.remove_variation(variation_id)?;
    persist(&state.db, &mut resume).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    /// `null` clears the selection.
    pub variation_id: Option<Uuid>,
}

/// PUT /api/v1/resumes/:id/entries/:entry_id/selection
pub async fn handle_set_selection(
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<Entry>, AppError> {
    let mut resume = load_resume(&state.db, id).await?;
    let entry = entry_mut(&mut resume, entry_id)?;
    match req.variation_id {
        Some(variation_id) => entry.select(variation_id)?,
        None => entry.clear_selection(),
    }
    let updated = entry.clone();

    persist(&state.db, &mut resume).await?;
    Ok(Json(updated))
}

fn entry_mut(resume: &mut Resume, entry_id: Uuid) -> Result<&mut Entry, AppError> {
    resume
        .entry_mut(entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))
}
