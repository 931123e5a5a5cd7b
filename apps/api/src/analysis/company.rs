//! Company Analyzer — heuristic culture scoring from a job description.
//!
//! Indicator tables are matched as lowercase substrings. Multi-word indicators
//! weigh more than single words because they are less likely to match by accident.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::job::{detect_tone, JobTone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Startup,
    BigTech,
    Enterprise,
    Consulting,
    Finance,
    Healthtech,
    /// No indicator matched.
    Tech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureValue {
    Innovation,
    Stability,
    Speed,
    Scale,
    Process,
    Leadership,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositioningAdvice {
    pub emphasize: Vec<String>,
    pub avoid: Vec<String>,
    pub language_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub company_name: Option<String>,
    pub company_type: CompanyType,
    /// 0.0 - 1.0
    pub confidence: f32,
    pub value_scores: BTreeMap<CultureValue, f32>,
    pub top_values: Vec<CultureValue>,
    pub positioning: PositioningAdvice,
    /// Tone the enhancer should write in.
    pub tone: JobTone,
}

const COMPANY_INDICATORS: &[(CompanyType, &[&str])] = &[
    (
        CompanyType::Startup,
        &[
            "startup", "scale-up", "growth stage", "series a", "series b", "venture backed",
            "fast-paced", "wearing many hats", "early stage", "founding team", "equity", "mvp",
            "product-market fit", "bootstrapped", "disruptive", "innovative",
        ],
    ),
    (
        CompanyType::BigTech,
        &[
            "faang", "google", "facebook", "amazon", "apple", "microsoft", "netflix", "meta",
            "alphabet", "distributed systems", "massive scale", "billions of users", "petabyte",
            "global infrastructure", "large-scale systems",
        ],
    ),
    (
        CompanyType::Enterprise,
        &[
            "enterprise", "fortune 500", "established company", "industry leader",
            "global organization", "multinational", "corporate", "traditional",
            "legacy systems", "compliance", "governance", "risk management",
            "stakeholder management", "enterprise architecture",
        ],
    ),
    (
        CompanyType::Consulting,
        &[
            "consulting", "client-facing", "client solutions", "professional services",
            "project-based", "client delivery", "billable hours", "engagement",
            "multiple clients", "client success", "implementation", "advisory",
        ],
    ),
    (
        CompanyType::Finance,
        &[
            "fintech", "financial services", "banking", "investment", "trading",
            "regulatory compliance", "sox", "pci", "financial modeling", "risk assessment",
            "audit", "capital markets",
        ],
    ),
    (
        CompanyType::Healthtech,
        &[
            "healthcare", "medical", "biotech", "pharmaceutical", "clinical", "fda", "hipaa",
            "patient data", "medical devices", "life sciences",
        ],
    ),
];

const VALUE_INDICATORS: &[(CultureValue, &[&str])] = &[
    (
        CultureValue::Innovation,
        &[
            "cutting-edge", "latest technology", "emerging tech", "research", "experimental",
            "prototype", "proof of concept", "innovation", "disruptive", "breakthrough",
            "pioneering", "state-of-the-art",
        ],
    ),
    (
        CultureValue::Stability,
        &[
            "proven", "established", "reliable", "stable", "mature", "production-ready",
            "enterprise-grade", "battle-tested", "robust", "scalable", "maintainable",
            "long-term",
        ],
    ),
    (
        CultureValue::Speed,
        &[
            "fast-paced", "rapid", "agile", "quick", "accelerated", "time-to-market",
            "iterative", "sprint", "deadline-driven", "fast delivery", "rapid prototyping",
            "mvp",
        ],
    ),
    (
        CultureValue::Scale,
        &[
            "large-scale", "massive", "millions", "billions", "global", "distributed",
            "high-volume", "enterprise-scale", "petabyte", "high-throughput",
            "concurrent users",
        ],
    ),
    (
        CultureValue::Process,
        &[
            "methodology", "framework", "best practices", "standards", "governance",
            "compliance", "documentation", "process improvement", "quality assurance",
            "code review", "testing",
        ],
    ),
    (
        CultureValue::Leadership,
        &[
            "lead", "mentor", "manage", "guide", "coordinate", "cross-functional",
            "stakeholder", "team leadership", "people management", "influence",
            "drive alignment",
        ],
    ),
];

/// Values scoring above this make the top-values list.
const TOP_VALUE_THRESHOLD: f32 = 0.1;
/// Values scoring above this produce a language tip.
const LANGUAGE_TIP_THRESHOLD: f32 = 0.6;

fn word_count(indicator: &str) -> usize {
    indicator.split_whitespace().count()
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

/// Scores the job description (plus company name, when given) against the
/// indicator tables.
pub fn analyze_company(jd: &str, company: Option<&str>) -> CompanyAnalysis {
    let text = match company {
        Some(name) => format!("{jd} {name}").to_lowercase(),
        None => jd.to_lowercase(),
    };

    let (company_type, confidence) = detect_company_type(&text);
    let value_scores = score_values(&text);
    let top_values = top_values(&value_scores);
    let positioning = positioning_advice(company_type, &value_scores);
    let tone = tone_for(company_type, detect_tone(jd));

    CompanyAnalysis {
        company_name: company
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        company_type,
        confidence,
        value_scores,
        top_values,
        positioning,
        tone,
    }
}

fn detect_company_type(text: &str) -> (CompanyType, f32) {
    let mut best: Option<(CompanyType, usize, usize, usize)> = None;
    for (kind, indicators) in COMPANY_INDICATORS {
        let matched: Vec<&&str> = indicators.iter().filter(|i| text.contains(**i)).collect();
        let score: usize = matched.iter().map(|i| word_count(i)).sum();
        if score > 0 && best.map_or(true, |(_, s, _, _)| score > s) {
            best = Some((*kind, score, matched.len(), indicators.len()));
        }
    }

    match best {
        Some((kind, _, matches, total)) => {
            let confidence = (matches as f32 / total as f32 * 2.0).min(1.0);
            (kind, round2(confidence))
        }
        None => (CompanyType::Tech, 0.5),
    }
}

fn score_values(text: &str) -> BTreeMap<CultureValue, f32> {
    VALUE_INDICATORS
        .iter()
        .map(|(value, indicators)| {
            let raw: usize = indicators
                .iter()
                .map(|i| text.matches(i).count() * word_count(i))
                .sum();
            let normalized = (raw as f32 / (indicators.len() * 3) as f32).min(1.0);
            (*value, round2(normalized))
        })
        .collect()
}

fn top_values(scores: &BTreeMap<CultureValue, f32>) -> Vec<CultureValue> {
    let mut ranked: Vec<(CultureValue, f32)> = scores
        .iter()
        .filter(|(_, s)| **s > TOP_VALUE_THRESHOLD)
        .map(|(v, s)| (*v, *s))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(3).map(|(v, _)| v).collect()
}

/// Tone the enhancer writes in. A matched company type wins; otherwise the
/// tone detected from the JD wording is kept.
pub fn tone_for(company_type: CompanyType, jd_tone: JobTone) -> JobTone {
    match company_type {
        CompanyType::Startup => JobTone::AggressiveStartup,
        CompanyType::BigTech => JobTone::ProductOriented,
        CompanyType::Enterprise
        | CompanyType::Consulting
        | CompanyType::Finance
        | CompanyType::Healthtech => JobTone::CollaborativeEnterprise,
        CompanyType::Tech => jd_tone,
    }
}

fn positioning_advice(
    company_type: CompanyType,
    scores: &BTreeMap<CultureValue, f32>,
) -> PositioningAdvice {
    let (emphasize, avoid): (&[&str], &[&str]) = match company_type {
        CompanyType::Startup => (
            &[
                "Speed of execution and rapid delivery",
                "Ownership and initiative-taking",
                "Resource efficiency and scrappy solutions",
                "Direct impact on business metrics",
            ],
            &[
                "Over-engineered solutions",
                "Long development cycles",
                "Corporate bureaucracy mentions",
            ],
        ),
        CompanyType::Enterprise => (
            &[
                "Scalability and maintainability",
                "Process improvement and standardization",
                "Cross-team collaboration",
                "Risk mitigation and stability",
            ],
            &[
                "Experimental or unproven technologies",
                "Quick hacks or shortcuts",
                "Solo contributor achievements only",
            ],
        ),
        CompanyType::BigTech => (
            &[
                "Large-scale system design",
                "Performance optimization at scale",
                "Cross-functional impact",
                "Technical leadership and mentoring",
            ],
            &[
                "Small-scale personal projects",
                "Technologies not used at big tech",
                "Lack of quantified impact",
            ],
        ),
        _ => (&[], &[]),
    };

    let score = |v: CultureValue| scores.get(&v).copied().unwrap_or(0.0);
    let mut language_tips = Vec::new();
    if score(CultureValue::Innovation) > LANGUAGE_TIP_THRESHOLD {
        language_tips.push("Use 'cutting-edge', 'emerging tech', 'innovation'".to_string());
    } else if score(CultureValue::Stability) > LANGUAGE_TIP_THRESHOLD {
        language_tips.push("Use 'proven', 'reliable', 'enterprise-grade'".to_string());
    }
    if score(CultureValue::Scale) > LANGUAGE_TIP_THRESHOLD {
        language_tips.push("Emphasize numbers: users, requests, data volume".to_string());
    }
    if score(CultureValue::Leadership) > LANGUAGE_TIP_THRESHOLD {
        language_tips.push("Highlight mentoring, cross-team work, influence".to_string());
    }

    PositioningAdvice {
        emphasize: emphasize.iter().map(|s| s.to_string()).collect(),
        avoid: avoid.iter().map(|s| s.to_string()).collect(),
        language_tips,
    }
}
