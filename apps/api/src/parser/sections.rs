//! Rule-based structuring: splits extracted resume text into typed sections
//! and entries. Every entry starts with one selected `original` variation.

use once_cell::sync::Lazy;
use regex::Regex;

use super::contact;
use crate::models::resume::{Entry, EntryContext, EntryKind, Section, SectionKind};

/// Header keywords per section kind. Checked in this order, so more specific
/// kinds (projects) win over broader ones (experience) on a shared word.
const SECTION_KEYWORDS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "profile",
            "objective",
            "overview",
            "professional summary",
            "career objective",
            "professional profile",
            "introduction",
            "executive summary",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "portfolio",
            "personal projects",
            "side projects",
            "key projects",
            "academic projects",
            "project experience",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "employment",
            "work history",
            "professional experience",
            "work experience",
            "employment history",
            "career history",
            "professional background",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic",
            "academic background",
            "educational background",
            "qualifications",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "competencies",
            "technologies",
            "core competencies",
            "expertise",
            "proficiencies",
            "programming languages",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certification",
            "certificates",
            "credentials",
            "licenses",
            "courses",
        ],
    ),
    (
        SectionKind::Achievements,
        &[
            "achievements",
            "awards",
            "honors",
            "accomplishments",
            "recognition",
            "distinctions",
        ],
    ),
];

const BULLET_GLYPHS: &[char] = &['•', '-', '–', '—', '*', '▪', '▫', '◦', '●', '○', '→', '➢', '■'];

const JOB_TITLE_WORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "specialist",
    "coordinator",
    "director",
    "lead",
    "senior",
    "junior",
    "intern",
    "consultant",
    "architect",
    "administrator",
    "designer",
    "scientist",
    "researcher",
    "officer",
    "executive",
    "supervisor",
    "technician",
    "associate",
    "founder",
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{4}|\d{1,2}/\d{4}|(?:19|20)\d{2})\b",
    )
    .unwrap()
});

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    let date = r"\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+\d{4}|\d{1,2}/\d{4}|(?:19|20)\d{2})\b";
    Regex::new(&format!(
        r"(?i){date}(?:\s*(?:-|–|—|to)\s*(?:{date}|present|current|now))?"
    ))
    .unwrap()
});

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[.)]\s+").unwrap());

static SKILL_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;|•]").unwrap());

/// Returns the section kind a header line introduces, if any.
pub fn detect_section_header(line: &str) -> Option<SectionKind> {
    let lower = line
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase();
    let word_count = lower.split_whitespace().count();
    if lower.len() < 3 || word_count > 6 || is_bullet(line) {
        return None;
    }

    SECTION_KEYWORDS.iter().find_map(|(kind, keywords)| {
        keywords
            .iter()
            .any(|kw| {
                lower == *kw
                    || lower.starts_with(kw)
                    || (word_count <= 3 && lower.contains(kw))
            })
            .then_some(*kind)
    })
}

pub fn is_bullet(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(BULLET_GLYPHS) || ORDINAL_RE.is_match(trimmed)
}

pub fn clean_bullet(line: &str) -> String {
    let trimmed = line.trim();
    let without_glyph = trimmed.trim_start_matches(BULLET_GLYPHS).trim_start();
    ORDINAL_RE.replace(without_glyph, "").trim().to_string()
}

/// Role/project header heuristics: job title words, dates, or a short line of
/// mostly capitalised words.
pub fn looks_like_entry_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > 12 || line.trim_end().ends_with('.') {
        return false;
    }
    if lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| JOB_TITLE_WORDS.contains(&w))
    {
        return true;
    }
    if DATE_RE.is_match(line) {
        return true;
    }
    (2..=6).contains(&words.len())
        && words
            .iter()
            .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
            .count()
            >= 2
}

/// Builds an entry context from a header line: the date range becomes the
/// period; the rest splits on `|`, ` at `, `,` or a spaced dash into
/// title, organization and location.
pub fn parse_entry_header(line: &str) -> EntryContext {
    let period = PERIOD_RE
        .find(line)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let rest = if period.is_empty() {
        line.to_string()
    } else {
        line.replacen(&period, " ", 1)
    };

    let parts: Vec<String> = rest
        .replace(" at ", "|")
        .replace(" - ", "|")
        .replace(" – ", "|")
        .replace(" — ", "|")
        .split(['|', ','])
        .map(|p| p.trim().trim_matches(['(', ')']).trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let mut parts = parts.into_iter();
    EntryContext {
        title: parts.next().unwrap_or_default(),
        organization: parts.next().unwrap_or_default(),
        location: parts.collect::<Vec<_>>().join(", "),
        period,
        technologies: Vec::new(),
    }
}

/// Fills empty fields of `ctx` from a follow-up header line.
fn merge_header(ctx: &mut EntryContext, next: EntryContext) {
    let mut leftovers = vec![next.title, next.organization]
        .into_iter()
        .filter(|s| !s.is_empty());
    if ctx.organization.is_empty() {
        if let Some(org) = leftovers.next() {
            ctx.organization = org;
        }
    }
    if ctx.location.is_empty() {
        let rest: Vec<String> = leftovers
            .chain(std::iter::once(next.location))
            .filter(|s| !s.is_empty())
            .collect();
        ctx.location = rest.join(", ");
    }
    if ctx.period.is_empty() {
        ctx.period = next.period;
    }
}

/// Splits free text into sentences on `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Splits a skills line into individual skills. A leading `Category:` prefix
/// becomes the returned category.
pub fn split_skills(line: &str) -> (Option<String>, Vec<String>) {
    let (category, list) = match line.split_once(':') {
        Some((head, tail)) if head.split_whitespace().count() <= 4 && !tail.trim().is_empty() => {
            (Some(head.trim().to_string()), tail)
        }
        _ => (None, line),
    };
    let skills = SKILL_SPLIT_RE
        .split(list)
        .map(|s| s.trim().trim_end_matches('.').trim())
        .filter(|s| {
            let len = s.chars().count();
            (2..=50).contains(&len)
                && s.split_whitespace().count() <= 4
                && !s.chars().take(3).any(|c| c.is_ascii_digit())
        })
        .map(|s| s.to_string())
        .collect();
    (category, skills)
}

/// Structures normalized resume text into sections. Lines before the first
/// recognised header are treated as the contact block and skipped.
pub fn structure_sections(text: &str) -> Vec<Section> {
    let mut blocks: Vec<(SectionKind, Vec<&str>)> = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(kind) = detect_section_header(line) {
            blocks.push((kind, Vec::new()));
        } else if let Some((_, lines)) = blocks.last_mut() {
            lines.push(line);
        }
    }

    let mut sections: Vec<Section> = Vec::new();
    for (kind, lines) in blocks {
        let entries = match kind {
            SectionKind::Summary => summary_entries(&lines),
            SectionKind::Experience | SectionKind::Projects | SectionKind::Education => {
                grouped_entries(kind, &lines)
            }
            SectionKind::Skills => skill_entries(&lines),
            SectionKind::Certifications => line_entries(&lines, EntryKind::Detail),
            SectionKind::Achievements | SectionKind::Other => {
                line_entries(&lines, EntryKind::Bullet)
            }
        };
        if entries.is_empty() {
            continue;
        }
        // A repeated header (e.g. "Experience" twice) extends the earlier section.
        match sections.iter_mut().find(|s| s.kind == kind) {
            Some(existing) => existing.entries.extend(entries),
            None => {
                let mut section = Section::new(kind);
                section.entries = entries;
                sections.push(section);
            }
        }
    }
    sections
}

fn summary_entries(lines: &[&str]) -> Vec<Entry> {
    let text = lines
        .iter()
        .filter(|l| !contact::is_contact_line(l))
        .map(|l| if is_bullet(l) { clean_bullet(l) } else { l.to_string() })
        .collect::<Vec<_>>()
        .join(" ");
    split_sentences(&text)
        .into_iter()
        .map(|s| Entry::from_text(EntryKind::Summary, None, &s))
        .collect()
}

/// Experience, projects and education: header lines open a context; bullets
/// and prose attach to the open context.
fn grouped_entries(kind: SectionKind, lines: &[&str]) -> Vec<Entry> {
    let prose_kind = if kind == SectionKind::Education {
        EntryKind::Detail
    } else {
        EntryKind::Overview
    };

    let mut entries: Vec<Entry> = Vec::new();
    let mut context: Option<EntryContext> = None;
    let mut context_has_entries = false;
    let mut pending: Option<(EntryKind, String)> = None;

    let flush = |pending: &mut Option<(EntryKind, String)>,
                 entries: &mut Vec<Entry>,
                 context: &Option<EntryContext>| {
        if let Some((entry_kind, text)) = pending.take() {
            if !text.trim().is_empty() {
                entries.push(Entry::from_text(entry_kind, context.clone(), &text));
            }
        }
    };

    for line in lines {
        if is_bullet(line) {
            flush(&mut pending, &mut entries, &context);
            pending = Some((EntryKind::Bullet, clean_bullet(line)));
            context_has_entries = true;
            continue;
        }

        let continues_previous = line.chars().next().is_some_and(|c| c.is_lowercase());
        if continues_previous {
            if let Some((_, text)) = pending.as_mut() {
                text.push(' ');
                text.push_str(line);
                continue;
            }
        }

        if looks_like_entry_header(line) {
            flush(&mut pending, &mut entries, &context);
            let header = parse_entry_header(line);
            match context.as_mut() {
                Some(ctx) if !context_has_entries => merge_header(ctx, header),
                _ => {
                    close_empty_context(&mut entries, &context, context_has_entries);
                    context = Some(header);
                    context_has_entries = false;
                }
            }
            continue;
        }

        match pending.as_mut() {
            Some((entry_kind, text)) if *entry_kind == prose_kind => {
                text.push(' ');
                text.push_str(line);
            }
            _ => {
                flush(&mut pending, &mut entries, &context);
                pending = Some((prose_kind, line.to_string()));
                context_has_entries = true;
            }
        }
    }
    flush(&mut pending, &mut entries, &context);
    close_empty_context(&mut entries, &context, context_has_entries);
    entries
}

/// A header with nothing under it (a degree line, a bare project name) still
/// becomes a detail entry so no content is lost.
fn close_empty_context(
    entries: &mut Vec<Entry>,
    context: &Option<EntryContext>,
    has_entries: bool,
) {
    if let Some(ctx) = context {
        if !has_entries {
            let headline = ctx.headline();
            if !headline.is_empty() {
                entries.push(Entry::from_text(
                    EntryKind::Detail,
                    Some(ctx.clone()),
                    &headline,
                ));
            }
        }
    }
}

fn skill_entries(lines: &[&str]) -> Vec<Entry> {
    let mut entries = Vec::new();
    for line in lines {
        let line = if is_bullet(line) {
            clean_bullet(line)
        } else {
            line.to_string()
        };
        let (category, skills) = split_skills(&line);
        let context = category.map(|title| EntryContext {
            title,
            ..Default::default()
        });
        entries.extend(
            skills
                .iter()
                .map(|s| Entry::from_text(EntryKind::Skill, context.clone(), s)),
        );
    }
    entries
}

/// One entry per bullet or line; lowercase-led lines continue the previous one.
fn line_entries(lines: &[&str], kind: EntryKind) -> Vec<Entry> {
    let mut texts: Vec<String> = Vec::new();
    for line in lines {
        let continues = !is_bullet(line) && line.chars().next().is_some_and(|c| c.is_lowercase());
        match texts.last_mut() {
            Some(last) if continues => {
                last.push(' ');
                last.push_str(line);
            }
            _ => texts.push(clean_bullet(line)),
        }
    }
    texts
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| Entry::from_text(kind, None, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Doe
jane@example.com | (555) 123-4567
PROFESSIONAL SUMMARY
Backend engineer with 8 years of experience. Focused on distributed systems!
EXPERIENCE
Senior Software Engineer | Acme Corp | Jan 2020 - Present
• Reduced p99 latency by 40% by redesigning the caching layer
• Led migration of 12 services to Kubernetes, cutting deploy
time from 2 hours to 10 minutes
Software Engineer
Globex, Austin TX
2016 - 2019
- Built billing pipeline processing $2M/day
EDUCATION
B.S. Computer Science, State University, 2016
SKILLS
Languages: Rust, Go, Python
Docker; Kubernetes | PostgreSQL
";

    #[test]
    fn test_detect_section_header() {
        assert_eq!(
            detect_section_header("PROFESSIONAL EXPERIENCE"),
            Some(SectionKind::Experience)
        );
        assert_eq!(detect_section_header("Skills:"), Some(SectionKind::Skills));
        assert_eq!(
            detect_section_header("Project Experience"),
            Some(SectionKind::Projects)
        );
        assert_eq!(
            detect_section_header("Gained extensive experience with distributed consensus protocols"),
            None
        );
        assert_eq!(detect_section_header("• Experience with Rust"), None);
    }

    #[test]
    fn test_bullets() {
        assert!(is_bullet("• Built a thing"));
        assert!(is_bullet("2) Built a thing"));
        assert!(!is_bullet("2019 Built a thing"));
        assert_eq!(clean_bullet("  –  Built a thing "), "Built a thing");
        assert_eq!(clean_bullet("3. Shipped v2"), "Shipped v2");
    }

    #[test]
    fn test_parse_entry_header() {
        let ctx = parse_entry_header("Senior Software Engineer | Acme Corp | Jan 2020 - Present");
        assert_eq!(ctx.title, "Senior Software Engineer");
        assert_eq!(ctx.organization, "Acme Corp");
        assert_eq!(ctx.period, "Jan 2020 - Present");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Built v2.0 of the API. Led a team! Done"),
            vec!["Built v2.0 of the API.", "Led a team!", "Done"]
        );
    }

    #[test]
    fn test_split_skills_with_category() {
        let (category, skills) = split_skills("Languages: Rust, Go; Python | 2019");
        assert_eq!(category.as_deref(), Some("Languages"));
        assert_eq!(skills, vec!["Rust", "Go", "Python"]);
    }

    #[test]
    fn test_structure_full_resume() {
        let sections = structure_sections(RESUME);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills
            ]
        );

        let summary = &sections[0];
        assert_eq!(summary.entries.len(), 2);
        assert_eq!(summary.entries[0].kind, EntryKind::Summary);

        let experience = &sections[1];
        let bullets: Vec<&Entry> = experience
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Bullet)
            .collect();
        assert_eq!(bullets.len(), 3);
        assert!(bullets[1].working_text().unwrap().ends_with("to 10 minutes"));
        let acme = bullets[0].context.as_ref().unwrap();
        assert_eq!(acme.organization, "Acme Corp");
        let globex = bullets[2].context.as_ref().unwrap();
        assert_eq!(globex.title, "Software Engineer");
        assert_eq!(globex.organization, "Globex");
        assert_eq!(globex.period, "2016 - 2019");

        let skills = &sections[3];
        let names: Vec<&str> = skills
            .entries
            .iter()
            .filter_map(|e| e.working_text())
            .collect();
        assert_eq!(
            names,
            vec!["Rust", "Go", "Python", "Docker", "Kubernetes", "PostgreSQL"]
        );
        assert_eq!(
            skills.entries[0].context.as_ref().unwrap().title,
            "Languages"
        );
    }

    #[test]
    fn test_every_entry_has_selected_original() {
        for section in structure_sections(RESUME) {
            for entry in &section.entries {
                assert_eq!(entry.variations.len(), 1);
                assert_eq!(entry.selected, Some(entry.variations[0].id));
            }
        }
    }

    #[test]
    fn test_education_header_becomes_detail() {
        let sections = structure_sections(RESUME);
        let education = &sections[2];
        assert_eq!(education.entries.len(), 1);
        assert_eq!(education.entries[0].kind, EntryKind::Detail);
    }

    #[test]
    fn test_text_without_headers_yields_no_sections() {
        assert!(structure_sections("just some words\nand more words").is_empty());
    }
}
