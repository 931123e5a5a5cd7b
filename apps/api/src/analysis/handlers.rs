//! Axum route handlers for job and company analysis.

use axum::Json;
use serde::Serialize;

use crate::analysis::company::{analyze_company, CompanyAnalysis};
use crate::analysis::job::{analyze_job, JobProfile};
use crate::errors::AppError;
use crate::models::job::JobDescription;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub company: CompanyAnalysis,
    pub job: JobProfile,
}

/// POST /api/v1/company/analyze
///
/// Previews what the enhancer and matcher will derive from a job description:
/// company type, culture values, positioning advice and the keyword inventory.
pub async fn handle_analyze_company(
    Json(jd): Json<JobDescription>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    jd.validate()?;

    Ok(Json(AnalyzeResponse {
        company: analyze_company(&jd.text, jd.company_name()),
        job: analyze_job(&jd.text),
    }))
}
