use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A job description supplied with a single request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub text: String,
    #[serde(default)]
    pub company: Option<String>,
}

impl JobDescription {
    /// Rejects blank job descriptions before any downstream work.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation(
                "job description cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// First `max_chars` characters, for prompt excerpts.
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.text.trim().chars().take(max_chars).collect()
    }
}
