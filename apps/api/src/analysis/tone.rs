//! Tone calibration and global verb tracking.
//!
//! Tone maps to verb sets for enhancement prompts. Verb tracking counts the
//! leading action verbs already used by the resume's selected variations so
//! rewrites do not keep opening with the same word.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::analysis::job::JobTone;
use crate::models::resume::{EntryKind, Resume};

/// A verb used this many times is "worn out": candidates opening with it rank last.
pub const VERB_REUSE_LIMIT: usize = 2;

/// Verb sets calibrated to a specific tone.
#[derive(Debug, Clone)]
pub struct ToneExamples {
    pub strong_verbs: Vec<&'static str>,
    pub avoid_verbs: Vec<&'static str>,
}

/// Returns tone-calibrated verb sets.
pub fn get_tone_examples(tone: JobTone) -> ToneExamples {
    match tone {
        JobTone::AggressiveStartup => ToneExamples {
            strong_verbs: vec![
                "Architected",
                "Spearheaded",
                "Owned",
                "Drove",
                "Built",
                "Shipped",
                "Launched",
                "Led",
            ],
            avoid_verbs: vec!["assisted", "helped", "supported", "participated in"],
        },
        JobTone::CollaborativeEnterprise => ToneExamples {
            strong_verbs: vec![
                "Partnered with",
                "Standardized",
                "Enabled",
                "Collaborated on",
                "Streamlined",
                "Facilitated",
            ],
            avoid_verbs: vec!["hacked", "disrupted", "moved fast", "solely built"],
        },
        JobTone::ResearchOriented => ToneExamples {
            strong_verbs: vec![
                "Investigated",
                "Designed and evaluated",
                "Published",
                "Proposed",
                "Analyzed",
                "Benchmarked",
            ],
            avoid_verbs: vec!["shipped", "launched", "moved fast", "disrupted"],
        },
        JobTone::ProductOriented => ToneExamples {
            strong_verbs: vec![
                "Shipped",
                "Delivered",
                "Launched",
                "Improved",
                "Reduced friction for",
                "Grew",
            ],
            avoid_verbs: vec!["investigated", "evaluated", "researched", "proposed"],
        },
    }
}

/// First word of a variation, lowercased, if it looks like a verb slot
/// (alphabetic, not a number or symbol).
pub fn leading_verb(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let word: String = first
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if word.len() >= 2 && word.chars().all(|c| c.is_alphabetic()) {
        Some(word)
    } else {
        None
    }
}

/// Leading-verb counts across the selected bullet and overview variations of
/// a resume, excluding one entry (the one being rewritten).
#[derive(Debug, Clone, Default)]
pub struct VerbUsage {
    counts: BTreeMap<String, usize>,
}

impl VerbUsage {
    pub fn from_resume(resume: &Resume, exclude_entry: Option<Uuid>) -> Self {
        let mut counts = BTreeMap::new();
        for entry in resume.entries() {
            if Some(entry.id) == exclude_entry
                || !matches!(entry.kind, EntryKind::Bullet | EntryKind::Overview)
            {
                continue;
            }
            if let Some(verb) = entry
                .selected_variation()
                .and_then(|v| leading_verb(&v.text))
            {
                *counts.entry(verb).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, verb: &str) -> usize {
        self.counts.get(&verb.to_lowercase()).copied().unwrap_or(0)
    }

    /// Verbs already used, most frequent first.
    pub fn used_verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<(&str, usize)> =
            self.counts.iter().map(|(v, c)| (v.as_str(), *c)).collect();
        verbs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        verbs.into_iter().map(|(v, _)| v).collect()
    }

    pub fn is_worn_out(&self, text: &str) -> bool {
        leading_verb(text).is_some_and(|v| self.count(&v) >= VERB_REUSE_LIMIT)
    }

    /// Stable partition: candidates opening with a worn-out verb move to the end.
    pub fn rank(&self, candidates: Vec<String>) -> Vec<String> {
        let (fresh, worn): (Vec<String>, Vec<String>) =
            candidates.into_iter().partition(|c| !self.is_worn_out(c));
        fresh.into_iter().chain(worn).collect()
    }
}
