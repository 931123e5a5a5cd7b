//! Fit Scoring — how well the currently selected variations cover a job's
//! keyword inventory.
//!
//! Algorithm:
//! 1. For each keyword in `JobProfile::keyword_inventory`:
//!    - exact skill or technology match → strength 1.0
//!    - whole-word mention in a selected variation's text → strength 0.6
//!    - no match → strength 0.0
//! 2. overall_score = Σ(strength × weighted_score) / Σ(weighted_score) × 100
//! 3. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::job::{mentions, tokenize, JobProfile};
use crate::models::resume::{Entry, EntryKind, Resume};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A JD keyword covered by the selected content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitMatch {
    pub keyword: String,
    pub entry_id: Uuid, // which entry covers it
    pub strength: f32,  // 0.0 – 1.0
}

/// A JD keyword not covered by any selected variation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub keyword: String,
    pub jd_frequency: u32,
    /// An entry with an unselected variation that mentions the keyword.
    pub suggestion: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub overall_score: u32,             // 0 – 100
    pub strong_matches: Vec<FitMatch>,  // strength ≥ 0.8
    pub partial_matches: Vec<FitMatch>, // 0.4 – 0.79
    pub gaps: Vec<Gap>,                 // strength < 0.4
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword fit algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn compute_fit(resume: &Resume, profile: &JobProfile) -> FitReport {
    let keywords = &profile.keyword_inventory;

    if keywords.is_empty() {
        return FitReport {
            overall_score: 0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: "No keywords found in the job description, cannot score fit."
                .to_string(),
        };
    }

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;

    for kw_entry in keywords {
        let keyword_lower = kw_entry.keyword.to_lowercase();
        total_weighted += kw_entry.weighted_score;

        let mut best_strength = 0.0_f32;
        let mut best_entry = None;

        for entry in resume.entries() {
            let strength = if tags(entry).iter().any(|t| *t == keyword_lower) {
                1.0
            } else if entry
                .selected_variation()
                .is_some_and(|v| mentions(&tokenize(&v.text), &keyword_lower))
            {
                0.6
            } else {
                0.0
            };

            if strength > best_strength {
                best_strength = strength;
                best_entry = Some(entry.id);
            }
        }

        total_score += best_strength * kw_entry.weighted_score;

        match best_entry {
            Some(entry_id) if best_strength >= 0.4 => {
                let fit_match = FitMatch {
                    keyword: kw_entry.keyword.clone(),
                    entry_id,
                    strength: best_strength,
                };
                if best_strength >= 0.8 {
                    strong_matches.push(fit_match);
                } else {
                    partial_matches.push(fit_match);
                }
            }
            _ => gaps.push(Gap {
                keyword: kw_entry.keyword.clone(),
                jd_frequency: kw_entry.frequency,
                suggestion: find_unselected_mention(resume, &keyword_lower),
            }),
        }
    }

    let overall_score = if total_weighted > 0.0 {
        ((total_score / total_weighted) * 100.0).round().min(100.0) as u32
    } else {
        0
    };

    let recommendation = build_recommendation(overall_score, &gaps);

    FitReport {
        overall_score,
        strong_matches,
        partial_matches,
        gaps,
        recommendation,
    }
}

/// Exact-match "tags" of an entry: its context technologies plus, for skill
/// entries, the comma-separated items of the selected text.
fn tags(entry: &Entry) -> Vec<String> {
    let mut tags: Vec<String> = entry
        .context
        .as_ref()
        .map(|ctx| ctx.technologies.iter().map(|t| t.trim().to_lowercase()).collect())
        .unwrap_or_default();
    if entry.kind == EntryKind::Skill {
        if let Some(selected) = entry.selected_variation() {
            tags.extend(
                selected
                    .text
                    .split([',', ';', '|'])
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty()),
            );
        }
    }
    tags
}

/// First entry holding an unselected variation that mentions the keyword.
fn find_unselected_mention(resume: &Resume, keyword: &str) -> Option<Uuid> {
    resume
        .entries()
        .find(|entry| {
            entry.variations.iter().any(|v| {
                Some(v.id) != entry.selected && mentions(&tokenize(&v.text), keyword)
            })
        })
        .map(|entry| entry.id)
}

/// Builds a human-readable recommendation string from score and gaps.
fn build_recommendation(score: u32, gaps: &[Gap]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        "Strong fit. The selected content directly covers the key job requirements.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate fit ({score}/100). Consider variations that mention: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({score}/100). Significant gaps: {}. Consider enhancing entries for this role.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
