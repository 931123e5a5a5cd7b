//! Variation selection — pluggable, trait-based chooser of the best phrasing
//! of an entry for a job.
//!
//! Default: `LlmSelector` (asks the text-generation service for an option number).
//! Alternative: `KeywordSelector` (pure-Rust, deterministic, no network).
//!
//! `AppState` holds an `Arc<dyn VariationSelector>`, chosen at startup via
//! `MATCHER_BACKEND`.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::job::{mentions, tokenize, JobProfile};
use crate::llm_client::prompts::{fill_template, numbered_options};
use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::prompts::{SELECT_PROMPT_TEMPLATE, SELECT_SYSTEM};
use crate::models::job::JobDescription;
use crate::models::resume::Entry;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static QUANTIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(\.\d+)?\s*(%|x\b|k\b|m\b|\+)|[$€£]\s*\d").unwrap());

/// Added to the keyword score of a variation that states a quantified outcome.
const QUANTIFIED_BONUS: f32 = 0.1;
const SCORE_EPSILON: f32 = 1e-6;
const JD_EXCERPT_CHARS: usize = 1500;
const PROMPT_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorBackend {
    Llm,
    Keyword,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Chooses one variation of an entry. Implement this to swap backends without
/// touching the matcher or its handler.
#[async_trait]
pub trait VariationSelector: Send + Sync {
    /// Index into `entry.variations` of the best option. Callers only pass
    /// entries with at least one variation.
    async fn choose(
        &self,
        entry: &Entry,
        jd: &JobDescription,
        profile: &JobProfile,
    ) -> Result<usize, LlmError>;

    fn backend(&self) -> SelectorBackend;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSelector
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic selector: weighted keyword coverage plus a small bonus for
/// quantified outcomes. Ties keep the current selection if it is among the
/// best, otherwise the earliest variation wins.
pub struct KeywordSelector;

#[async_trait]
impl VariationSelector for KeywordSelector {
    async fn choose(
        &self,
        entry: &Entry,
        _jd: &JobDescription,
        profile: &JobProfile,
    ) -> Result<usize, LlmError> {
        Ok(keyword_choice(entry, profile))
    }

    fn backend(&self) -> SelectorBackend {
        SelectorBackend::Keyword
    }
}

/// Weighted share of the keyword inventory a text covers, in [0, 1], plus the
/// quantified-outcome bonus.
pub fn keyword_score(text: &str, profile: &JobProfile) -> f32 {
    let total: f32 = profile
        .keyword_inventory
        .iter()
        .map(|k| k.weighted_score)
        .sum();
    let bonus = if QUANTIFIED_RE.is_match(text) {
        QUANTIFIED_BONUS
    } else {
        0.0
    };
    if total <= 0.0 {
        return bonus;
    }

    let tokens = tokenize(text);
    let covered: f32 = profile
        .keyword_inventory
        .iter()
        .filter(|k| mentions(&tokens, &k.keyword))
        .map(|k| k.weighted_score)
        .sum();

    covered / total + bonus
}

fn keyword_choice(entry: &Entry, profile: &JobProfile) -> usize {
    let scores: Vec<f32> = entry
        .variations
        .iter()
        .map(|v| keyword_score(&v.text, profile))
        .collect();
    let best = scores.iter().copied().fold(f32::MIN, f32::max);
    let is_best = |i: usize| (scores[i] - best).abs() <= SCORE_EPSILON;

    entry
        .selected
        .and_then(|id| entry.variations.iter().position(|v| v.id == id))
        .filter(|&i| is_best(i))
        .or_else(|| (0..scores.len()).find(|&i| is_best(i)))
        .unwrap_or(0)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSelector
// ────────────────────────────────────────────────────────────────────────────

/// Asks the text-generation service for the number of the best option.
/// Entries with a single variation are decided without a call.
pub struct LlmSelector {
    generator: Arc<dyn TextGenerator>,
}

impl LlmSelector {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl VariationSelector for LlmSelector {
    async fn choose(
        &self,
        entry: &Entry,
        jd: &JobDescription,
        profile: &JobProfile,
    ) -> Result<usize, LlmError> {
        if entry.variations.len() <= 1 {
            return Ok(0);
        }

        let prompt = build_select_prompt(entry, jd, profile);
        let answer = self.generator.complete(&prompt, SELECT_SYSTEM).await?;
        parse_option_number(&answer, entry.variations.len())
    }

    fn backend(&self) -> SelectorBackend {
        SelectorBackend::Llm
    }
}

fn build_select_prompt(entry: &Entry, jd: &JobDescription, profile: &JobProfile) -> String {
    let options: Vec<&str> = entry.variations.iter().map(|v| v.text.as_str()).collect();
    let keywords: Vec<&str> = profile.keywords().into_iter().take(PROMPT_KEYWORDS).collect();
    let context = entry
        .context
        .as_ref()
        .map(|c| c.headline())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "(standalone entry)".to_string());

    let jd_excerpt = jd.excerpt(JD_EXCERPT_CHARS);
    let keywords = keywords.join(", ");
    let option_list = numbered_options(&options);
    let option_count = options.len().to_string();

    fill_template(
        SELECT_PROMPT_TEMPLATE,
        &[
            ("jd_excerpt", jd_excerpt.as_str()),
            ("keywords", keywords.as_str()),
            ("context", context.as_str()),
            ("options", option_list.as_str()),
            ("option_count", option_count.as_str()),
        ],
    )
}

/// First integer in the answer, converted to a zero-based index.
fn parse_option_number(answer: &str, option_count: usize) -> Result<usize, LlmError> {
    let number = NUMBER_RE
        .find(answer)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .ok_or_else(|| LlmError::InvalidAnswer(format!("no option number in '{}'", answer.trim())))?;

    if number == 0 || number > option_count {
        return Err(LlmError::InvalidAnswer(format!(
            "option {number} is out of range 1-{option_count}"
        )));
    }
    Ok(number - 1)
}
