//! Matcher: selects exactly one variation per entry for a job description and
//! reports how well the resulting selection fits.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::job::analyze_job;
use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::matching::fit_scoring::{compute_fit, FitReport};
use crate::matching::selector::{SelectorBackend, VariationSelector};
use crate::models::job::JobDescription;
use crate::models::resume::Resume;

#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub entry_id: Uuid,
    pub variation_id: Uuid,
    /// True when the matcher picked a different variation than was selected.
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub selections: Vec<Selection>,
    /// Entries with no variations to choose from.
    pub skipped: Vec<Uuid>,
    pub fit_report: FitReport,
    pub backend: SelectorBackend,
}

/// Runs the selector over every entry and applies its choices to `resume`.
///
/// Any selector failure aborts the whole match; callers persist only on `Ok`.
pub async fn match_resume(
    selector: &dyn VariationSelector,
    resume: &mut Resume,
    jd: &JobDescription,
) -> Result<MatchOutcome, AppError> {
    jd.validate()?;
    let profile = analyze_job(&jd.text);

    let mut choices = Vec::new();
    let mut skipped = Vec::new();
    for entry in resume.entries() {
        if entry.variations.is_empty() {
            skipped.push(entry.id);
            continue;
        }
        let idx = selector.choose(entry, jd, &profile).await?;
        let variation_id = entry
            .variations
            .get(idx)
            .map(|v| v.id)
            .ok_or_else(|| {
                LlmError::InvalidAnswer(format!(
                    "selector chose option {idx} of {} for entry {}",
                    entry.variations.len(),
                    entry.id
                ))
            })?;
        choices.push(Selection {
            entry_id: entry.id,
            variation_id,
            changed: entry.selected != Some(variation_id),
        });
    }

    for choice in &choices {
        if let Some(entry) = resume.entry_mut(choice.entry_id) {
            entry.select(choice.variation_id)?;
        }
    }

    let fit_report = compute_fit(resume, &profile);
    info!(
        "Matched resume {} with {:?} selector: {} selections ({} changed), {} skipped, fit {}",
        resume.id,
        selector.backend(),
        choices.len(),
        choices.iter().filter(|c| c.changed).count(),
        skipped.len(),
        fit_report.overall_score
    );

    Ok(MatchOutcome {
        selections: choices,
        skipped,
        fit_report,
        backend: selector.backend(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::analysis::job::JobProfile;
    use crate::llm_client::mock::ScriptedGenerator;
    use crate::matching::selector::{KeywordSelector, LlmSelector};
    use crate::models::resume::{
        ContactInfo, Entry, EntryKind, Section, SectionKind, Variation, VariationSource,
    };

    const JD: &str = "Senior Rust Engineer\nRequirements: Rust, Kafka.";

    /// Test double that always returns the same index.
    struct FixedSelector(usize);

    #[async_trait]
    impl VariationSelector for FixedSelector {
        async fn choose(
            &self,
            _entry: &Entry,
            _jd: &JobDescription,
            _profile: &JobProfile,
        ) -> Result<usize, LlmError> {
            Ok(self.0)
        }

        fn backend(&self) -> SelectorBackend {
            SelectorBackend::Keyword
        }
    }

    fn job(text: &str) -> JobDescription {
        JobDescription {
            text: text.to_string(),
            company: None,
        }
    }

    /// Entry 0: two variations. Entry 1: one variation. Entry 2: none.
    fn resume() -> Resume {
        let mut two = Entry::from_text(EntryKind::Bullet, None, "Organized offsites");
        two.add_variation(Variation::new("Built Kafka pipelines in Rust", VariationSource::User))
            .unwrap();
        let one = Entry::from_text(EntryKind::Bullet, None, "Mentored interns");
        let mut empty = Entry::from_text(EntryKind::Bullet, None, "placeholder");
        let only = empty.variations[0].id;
        empty.remove_variation(only).unwrap();

        let mut section = Section::new(SectionKind::Experience);
        section.entries = vec![two, one, empty];
        Resume::new(ContactInfo::default(), vec![section])
    }

    #[tokio::test]
    async fn test_every_entry_with_variations_gets_one_selection() {
        let mut resume = resume();
        let outcome = match_resume(&KeywordSelector, &mut resume, &job(JD))
            .await
            .unwrap();

        assert_eq!(outcome.selections.len(), 2);
        assert_eq!(outcome.skipped, vec![resume.sections[0].entries[2].id]);
        assert_eq!(outcome.backend, SelectorBackend::Keyword);

        let first = &resume.sections[0].entries[0];
        assert_eq!(
            first.selected_variation().unwrap().text,
            "Built Kafka pipelines in Rust"
        );
        assert!(outcome.selections[0].changed);
        assert!(!outcome.selections[1].changed);
        assert!(outcome.fit_report.overall_score > 0);
    }

    #[tokio::test]
    async fn test_llm_backend_calls_once_per_multi_variation_entry() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("1".to_string())]));
        let selector = LlmSelector::new(generator.clone());
        let mut resume = resume();

        let outcome = match_resume(&selector, &mut resume, &job(JD)).await.unwrap();

        assert_eq!(generator.call_count(), 1);
        assert_eq!(outcome.selections.len(), 2);
        assert_eq!(
            resume.sections[0].entries[0].selected_variation().unwrap().text,
            "Organized offsites"
        );
    }

    #[tokio::test]
    async fn test_selector_failure_leaves_selections_untouched() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(LlmError::Quota {
            message: "rate limited".to_string(),
        })]));
        let selector = LlmSelector::new(generator);
        let mut resume = resume();
        let before = resume.clone();

        let err = match_resume(&selector, &mut resume, &job(JD)).await.unwrap_err();
        assert!(matches!(err, AppError::Quota(_)));
        assert_eq!(resume, before);
    }

    #[tokio::test]
    async fn test_empty_job_description_rejected() {
        let mut resume = resume();
        let err = match_resume(&KeywordSelector, &mut resume, &job(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_choice_is_service_error() {
        let mut resume = resume();
        let before = resume.clone();
        let err = match_resume(&FixedSelector(99), &mut resume, &job(JD))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Service(_)));
        assert_eq!(resume, before);
    }
}
