//! Enhancement Client: asks the text-generation service for rewrites of one
//! entry, targeted at a job description, and appends them as unselected
//! `enhanced` variations.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::company::{analyze_company, CompanyAnalysis};
use crate::analysis::job::{analyze_job, JobProfile};
use crate::analysis::tone::{get_tone_examples, VerbUsage};
use crate::enhance::dedup::is_duplicate;
use crate::enhance::prompts::{ENHANCE_PROMPT_TEMPLATE, ENHANCE_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::{generate_json, LlmError, TextGenerator};
use crate::models::job::JobDescription;
use crate::models::resume::{Entry, EntryKind, Resume, Variation, VariationSource};
use crate::parser::sections::clean_bullet;

pub const DEFAULT_COUNT: usize = 3;
pub const MAX_COUNT: usize = 5;
const JD_EXCERPT_CHARS: usize = 2000;
const PROMPT_KEYWORDS: usize = 12;

#[derive(Debug, Deserialize)]
struct EnhanceOutput {
    #[serde(default)]
    variations: Vec<String>,
}

/// Generates up to `count` rewrites for one entry and appends them to it.
///
/// The job description is validated before any network call. Returns the
/// variations that were added; the entry's selection is left untouched.
pub async fn enhance_entry(
    generator: &dyn TextGenerator,
    resume: &mut Resume,
    entry_id: Uuid,
    jd: &JobDescription,
    count: usize,
) -> Result<Vec<Variation>, AppError> {
    jd.validate()?;
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_COUNT}, got {count}"
        )));
    }

    let entry = resume
        .entry(entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;
    let original = entry
        .working_text()
        .ok_or_else(|| AppError::Validation(format!("Entry {entry_id} has no text to enhance")))?;

    let company = analyze_company(&jd.text, jd.company_name());
    let profile = analyze_job(&jd.text);
    let verbs = VerbUsage::from_resume(resume, Some(entry_id));
    let prompt = build_enhance_prompt(entry, original, jd, &company, &profile, &verbs, count);
    let existing: Vec<String> = entry.variations.iter().map(|v| v.text.clone()).collect();

    info!(
        "Enhancing entry {entry_id}: tone={:?}, company_type={:?}, count={count}",
        company.tone, company.company_type
    );

    let output: EnhanceOutput = generate_json(generator, &prompt, ENHANCE_SYSTEM).await?;
    let candidates = clean_candidates(output.variations, &existing, &verbs, count);
    if candidates.is_empty() {
        return Err(LlmError::InvalidAnswer(
            "response contained no new variations".to_string(),
        )
        .into());
    }

    let source = VariationSource::Enhanced {
        model: generator.model().to_string(),
        company: jd.company_name().map(str::to_string),
    };
    let entry = resume
        .entry_mut(entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;

    let mut added = Vec::with_capacity(candidates.len());
    for text in candidates {
        let variation = Variation::new(text, source.clone());
        entry.add_variation(variation.clone())?;
        added.push(variation);
    }

    info!("Added {} variations to entry {entry_id}", added.len());
    Ok(added)
}

/// Trims, strips bullet glyphs, drops empties and near-duplicates (of existing
/// variations and of each other), ranks worn-out verbs last, then truncates.
fn clean_candidates(
    raw: Vec<String>,
    existing: &[String],
    verbs: &VerbUsage,
    count: usize,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for candidate in raw {
        let text = clean_bullet(candidate.trim().trim_matches('"'));
        if text.is_empty() {
            continue;
        }
        if existing
            .iter()
            .chain(kept.iter())
            .any(|other| is_duplicate(other, &text))
        {
            continue;
        }
        kept.push(text);
    }

    let mut ranked = verbs.rank(kept);
    ranked.truncate(count);
    ranked
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Summary => "summary sentence",
        EntryKind::Overview => "role overview",
        EntryKind::Bullet => "accomplishment bullet",
        EntryKind::Skill => "skill group",
        EntryKind::Detail => "detail line",
    }
}

fn build_enhance_prompt(
    entry: &Entry,
    original: &str,
    jd: &JobDescription,
    company: &CompanyAnalysis,
    profile: &JobProfile,
    verbs: &VerbUsage,
    count: usize,
) -> String {
    let context = entry
        .context
        .as_ref()
        .map(|ctx| {
            let mut parts = vec![ctx.headline()];
            if !ctx.location.is_empty() {
                parts.push(ctx.location.clone());
            }
            if !ctx.technologies.is_empty() {
                parts.push(format!("Technologies: {}", ctx.technologies.join(", ")));
            }
            parts.join("\n")
        })
        .unwrap_or_else(|| "(standalone entry)".to_string());

    let tone = get_tone_examples(company.tone);
    let used = verbs.used_verbs();
    let used_verbs = if used.is_empty() {
        "(none yet)".to_string()
    } else {
        used.join(", ")
    };
    let keywords: Vec<&str> = profile.keywords().into_iter().take(PROMPT_KEYWORDS).collect();
    let positioning = if company.positioning.emphasize.is_empty() {
        "Lead with concrete, quantified impact.".to_string()
    } else {
        format!(
            "Emphasize: {}\nAvoid: {}",
            company.positioning.emphasize.join("; "),
            company.positioning.avoid.join("; ")
        )
    };

    let count = count.to_string();
    let jd_excerpt = jd.excerpt(JD_EXCERPT_CHARS);
    let keywords = keywords.join(", ");
    let strong_verbs = tone.strong_verbs.join(", ");
    let avoid_verbs = tone.avoid_verbs.join(", ");

    fill_template(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("truthfulness_instruction", TRUTHFULNESS_INSTRUCTION),
            ("count", count.as_str()),
            ("kind", kind_label(entry.kind)),
            ("entry_text", original),
            ("context", context.as_str()),
            ("company", jd.company_name().unwrap_or("(not given)")),
            ("jd_excerpt", jd_excerpt.as_str()),
            ("keywords", keywords.as_str()),
            ("strong_verbs", strong_verbs.as_str()),
            ("avoid_verbs", avoid_verbs.as_str()),
            ("used_verbs", used_verbs.as_str()),
            ("positioning", positioning.as_str()),
        ],
    )
}
