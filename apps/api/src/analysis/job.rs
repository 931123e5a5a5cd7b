//! Job Analyzer — deterministic keyword inventory and tone detection for a raw
//! job description. No LLM call: the matcher and fit report must be
//! reproducible for the same input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Detected tone of a job description. Drives verb selection in enhancement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTone {
    AggressiveStartup,
    #[default]
    CollaborativeEnterprise,
    ResearchOriented,
    ProductOriented,
}

/// A single keyword from the JD, weighted by position and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProfile {
    pub keyword_inventory: Vec<KeywordEntry>,
    pub detected_tone: JobTone,
    pub seniority: String,
}

impl JobProfile {
    pub fn keywords(&self) -> Vec<&str> {
        self.keyword_inventory
            .iter()
            .map(|k| k.keyword.as_str())
            .collect()
    }
}

const MAX_KEYWORDS: usize = 20;

/// Multi-word terms matched as a unit before single-token extraction.
const KNOWN_PHRASES: &[&str] = &[
    "machine learning",
    "deep learning",
    "data analysis",
    "data engineering",
    "distributed systems",
    "system design",
    "computer science",
    "product management",
    "project management",
    "natural language processing",
    "large language models",
    "cloud infrastructure",
    "site reliability",
    "test automation",
    "continuous integration",
    "rest api",
    "event driven",
    "cross-functional",
    "spring boot",
    "ruby on rails",
];

/// Single tokens always treated as keywords even when they appear once.
const TECH_TERMS: &[&str] = &[
    "rust", "go", "golang", "python", "java", "javascript", "typescript", "kotlin", "swift",
    "scala", "ruby", "php", "c", "c++", "c#", "sql", "nosql", "react", "angular", "vue",
    "node.js", "django", "flask", "aws", "gcp", "azure", "docker", "kubernetes", "terraform",
    "kafka", "spark", "hadoop", "airflow", "postgresql", "postgres", "mysql", "mongodb",
    "redis", "elasticsearch", "graphql", "grpc", "api", "apis", "microservices", "linux",
    "git", "ci/cd", "agile", "scrum", "pytorch", "tensorflow", "llm", "nlp", "etl",
    "tableau", "excel", "figma", "security", "devops", "backend", "frontend", "fullstack",
    "mobile", "ios", "android", "observability", "testing", "leadership", "mentoring",
];

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "for", "with", "at", "by",
    "from", "as", "is", "are", "be", "been", "will", "would", "should", "can", "could", "may",
    "our", "we", "you", "your", "they", "their", "this", "that", "these", "those", "it", "its",
    "who", "what", "which", "how", "all", "any", "both", "each", "more", "most", "other",
    "some", "such", "into", "about", "than", "also", "if", "not", "no", "so", "do", "does",
    "have", "has", "had", "us", "per", "within", "across", "including", "etc", "plus",
    "experience", "years", "year", "team", "teams", "work", "working", "role", "ability",
    "strong", "skills", "knowledge", "understanding", "required", "requirements", "preferred",
    "qualifications", "responsibilities", "nice", "must", "looking", "join", "help", "new",
    "using", "build", "building", "job", "candidate", "company", "opportunity", "including",
    "based", "well", "good", "great", "excellent", "familiarity", "equivalent", "degree",
];

/// Analyzes a job description. Callers must reject blank input first.
pub fn analyze_job(text: &str) -> JobProfile {
    JobProfile {
        keyword_inventory: extract_keywords(text),
        detected_tone: detect_tone(text),
        seniority: detect_seniority(text),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Zone {
    Title,
    Requirements,
    Responsibilities,
    About,
}

impl Zone {
    fn weight(self) -> f32 {
        match self {
            Zone::Title => 1.0,
            Zone::Requirements => 0.8,
            Zone::Responsibilities => 0.6,
            Zone::About => 0.3,
        }
    }
}

fn zone_marker(line: &str) -> Option<Zone> {
    let lower = line.to_lowercase();
    let head: String = lower.chars().take(40).collect();
    if ["requirement", "qualification", "must have", "you have", "what you bring", "required", "preferred", "nice to have"]
        .iter()
        .any(|m| head.contains(m))
    {
        Some(Zone::Requirements)
    } else if ["responsibilit", "what you'll do", "what you will do", "the role", "you will"]
        .iter()
        .any(|m| head.contains(m))
    {
        Some(Zone::Responsibilities)
    } else if ["about us", "about the company", "who we are", "about:", "benefits", "perks"]
        .iter()
        .any(|m| head.contains(m))
    {
        Some(Zone::About)
    } else {
        None
    }
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-')))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | '/' | '-')))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Occurrences of `term` among `tokens` as whole words. Multi-word terms must
/// match consecutive tokens.
pub fn count_mentions(tokens: &[String], term: &str) -> usize {
    let needle = tokenize(term);
    if needle.is_empty() || needle.len() > tokens.len() {
        return 0;
    }
    tokens
        .windows(needle.len())
        .filter(|window| *window == needle.as_slice())
        .count()
}

pub fn mentions(tokens: &[String], term: &str) -> bool {
    count_mentions(tokens, term) > 0
}

/// Builds the weighted keyword inventory, highest weighted score first.
pub fn extract_keywords(text: &str) -> Vec<KeywordEntry> {
    // keyword -> (frequency, best position weight)
    let mut stats: HashMap<String, (u32, f32)> = HashMap::new();
    let mut zone = Zone::Responsibilities;

    for (idx, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
        let line_zone = if idx == 0 {
            Zone::Title
        } else {
            if let Some(z) = zone_marker(line) {
                zone = z;
            }
            zone
        };
        let weight = line_zone.weight();
        let lower = line.to_lowercase();

        let mut record = |kw: &str| {
            let entry = stats.entry(kw.to_string()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 = entry.1.max(weight);
        };

        // Phrases are consumed so their words are not counted again as tokens.
        let mut remainder = lower.clone();
        for phrase in KNOWN_PHRASES {
            for _ in 0..remainder.matches(phrase).count() {
                record(phrase);
            }
            remainder = remainder.replace(phrase, " ");
        }
        for token in tokenize(&remainder) {
            if STOPWORDS.contains(&token.as_str()) || token.starts_with(|c: char| c.is_ascii_digit())
            {
                continue;
            }
            record(&token);
        }
    }

    let mut inventory: Vec<KeywordEntry> = stats
        .into_iter()
        .filter(|(kw, (freq, _))| {
            TECH_TERMS.contains(&kw.as_str())
                || KNOWN_PHRASES.contains(&kw.as_str())
                || (*freq >= 2 && kw.chars().count() >= 3)
                || kw.chars().any(|c| matches!(c, '+' | '#' | '.' | '/'))
        })
        .map(|(keyword, (frequency, position_weight))| KeywordEntry {
            weighted_score: frequency as f32 * position_weight,
            keyword,
            frequency,
            position_weight,
        })
        .collect();

    inventory.sort_by(|a, b| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    inventory.truncate(MAX_KEYWORDS);
    inventory
}

const TONE_INDICATORS: &[(JobTone, &[&str])] = &[
    (
        JobTone::AggressiveStartup,
        &[
            "fast-paced", "move fast", "startup", "own everything", "end-to-end", "series a",
            "series b", "zero to", "scrappy", "hustle", "wear many hats", "founding",
        ],
    ),
    (
        JobTone::CollaborativeEnterprise,
        &[
            "collaborative", "partner with", "stakeholder", "enterprise", "cross-functional",
            "support", "contribute", "global", "employees", "process",
        ],
    ),
    (
        JobTone::ResearchOriented,
        &[
            "research", "publish", "phd", "investigate", "novel", "papers", "neurips", "icml",
            "experiment", "scientist",
        ],
    ),
    (
        JobTone::ProductOriented,
        &[
            "customer", "user experience", "product", "ship", "launch", "delight", "roadmap",
            "metrics", "growth",
        ],
    ),
];

/// Tone with the most indicator hits; ties and no hits fall back to the default.
pub fn detect_tone(text: &str) -> JobTone {
    let tokens = tokenize(text);
    let mut best = (JobTone::default(), 0usize);
    for (tone, indicators) in TONE_INDICATORS {
        let hits: usize = indicators.iter().map(|i| count_mentions(&tokens, i)).sum();
        if hits > best.1 {
            best = (*tone, hits);
        }
    }
    best.0
}

fn detect_seniority(text: &str) -> String {
    let lower = text.to_lowercase();
    let head: String = lower.lines().take(3).collect::<Vec<_>>().join(" ");
    for (needle, level) in [
        ("principal", "principal"),
        ("staff", "staff"),
        ("lead", "lead"),
        ("senior", "senior"),
        ("sr.", "senior"),
        ("junior", "junior"),
        ("jr.", "junior"),
        ("intern", "intern"),
        ("entry level", "junior"),
    ] {
        if head.contains(needle) {
            return level.to_string();
        }
    }
    "mid".to_string()
}
