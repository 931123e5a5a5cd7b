use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::Resume;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored resume {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts or replaces the full resume document.
pub async fn save_resume(pool: &SqlitePool, resume: &Resume) -> Result<(), StoreError> {
    let document = serde_json::to_string(resume).map_err(|e| StoreError::Corrupt {
        id: resume.id.to_string(),
        reason: e.to_string(),
    })?;

    sqlx::query(
        r#"
        INSERT INTO resumes (id, name, document, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            document = excluded.document,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(resume.id.to_string())
    .bind(&resume.name)
    .bind(document)
    .bind(resume.created_at)
    .bind(resume.updated_at)
    .execute(pool)
    .await?;

    debug!("Saved resume {}", resume.id);
    Ok(())
}

pub async fn get_resume(pool: &SqlitePool, id: Uuid) -> Result<Option<Resume>, StoreError> {
    let document: Option<String> = sqlx::query_scalar("SELECT document FROM resumes WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    document
        .map(|doc| {
            serde_json::from_str(&doc).map_err(|e| StoreError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// All resumes, most recently updated first.
pub async fn list_resumes(pool: &SqlitePool) -> Result<Vec<ResumeSummary>, StoreError> {
    let rows: Vec<(String, String, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, name, created_at, updated_at FROM resumes ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, name, created_at, updated_at)| {
            let parsed = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt {
                id: id.clone(),
                reason: e.to_string(),
            })?;
            Ok(ResumeSummary {
                id: parsed,
                name,
                created_at,
                updated_at,
            })
        })
        .collect()
}

/// Returns `false` if no resume had that id.
pub async fn delete_resume(pool: &SqlitePool, id: Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
