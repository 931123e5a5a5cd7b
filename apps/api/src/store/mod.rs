/// Content Store — resumes and their per-entry variations, persisted in SQLite.
pub mod handlers;
pub mod repository;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;

/// Loads a resume or fails with `NotFound`.
pub async fn load_resume(pool: &SqlitePool, id: Uuid) -> Result<Resume, AppError> {
    repository::get_resume(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// Bumps `updated_at` and writes the resume back.
pub async fn persist(pool: &SqlitePool, resume: &mut Resume) -> Result<(), AppError> {
    resume.touch();
    repository::save_resume(pool, resume).await?;
    Ok(())
}
