//! AI-assisted structuring. The model returns a fixed JSON shape which is
//! cleaned and mapped onto the same Section/Entry model the rule-based parser
//! produces.

use serde::Deserialize;

use super::prompts::{PARSE_PROMPT_TEMPLATE, PARSE_SYSTEM};
use crate::llm_client::{generate_json, LlmError, TextGenerator};
use crate::models::resume::{ContactInfo, Entry, EntryContext, EntryKind, Section, SectionKind};

/// Upper bound on resume text sent to the model.
const MAX_PROMPT_CHARS: usize = 12_000;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiResume {
    pub contact: ContactInfo,
    pub summary: Vec<String>,
    pub experience: Vec<AiRole>,
    pub education: Vec<AiEducation>,
    pub skills: Vec<AiSkillGroup>,
    pub projects: Vec<AiProject>,
    pub certifications: Vec<AiCertification>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiRole {
    pub position: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub overview: String,
    pub accomplishments: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiEducation {
    pub degree: String,
    pub institution: String,
    pub graduation: String,
    pub location: String,
    pub details: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiSkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiProject {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiCertification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

pub async fn ai_structure(
    generator: &dyn TextGenerator,
    text: &str,
) -> Result<(ContactInfo, Vec<Section>), LlmError> {
    let excerpt: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let prompt = PARSE_PROMPT_TEMPLATE.replace("{resume_text}", &excerpt);
    let parsed: AiResume = generate_json(generator, &prompt, PARSE_SYSTEM).await?;
    Ok(into_sections(parsed))
}

fn clean(s: &str) -> String {
    s.trim().to_string()
}

fn cleaned(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| clean(s))
        .filter(|s| !s.is_empty())
        .collect()
}

fn push_entries(
    section: &mut Section,
    kind: EntryKind,
    context: Option<&EntryContext>,
    texts: &[String],
) {
    section.entries.extend(
        cleaned(texts)
            .iter()
            .map(|t| Entry::from_text(kind, context.cloned(), t)),
    );
}

/// Maps the model's JSON onto sections in canonical order, dropping empties.
pub fn into_sections(parsed: AiResume) -> (ContactInfo, Vec<Section>) {
    let contact = ContactInfo {
        name: clean(&parsed.contact.name),
        title: clean(&parsed.contact.title),
        email: clean(&parsed.contact.email),
        phone: clean(&parsed.contact.phone),
        location: clean(&parsed.contact.location),
        linkedin: clean(&parsed.contact.linkedin),
        github: clean(&parsed.contact.github),
        website: clean(&parsed.contact.website),
    };

    let mut sections: Vec<Section> = Vec::new();
    for kind in SectionKind::CANONICAL_ORDER {
        let mut section = Section::new(kind);
        match kind {
            SectionKind::Summary => {
                push_entries(&mut section, EntryKind::Summary, None, &parsed.summary);
            }
            SectionKind::Experience => {
                for role in &parsed.experience {
                    let ctx = EntryContext {
                        title: clean(&role.position),
                        organization: clean(&role.company),
                        period: clean(&role.duration),
                        location: clean(&role.location),
                        technologies: Vec::new(),
                    };
                    push_entries(
                        &mut section,
                        EntryKind::Overview,
                        Some(&ctx),
                        std::slice::from_ref(&role.overview),
                    );
                    push_entries(
                        &mut section,
                        EntryKind::Bullet,
                        Some(&ctx),
                        &role.accomplishments,
                    );
                }
            }
            SectionKind::Projects => {
                for project in &parsed.projects {
                    let ctx = EntryContext {
                        title: clean(&project.name),
                        technologies: cleaned(&project.technologies),
                        ..Default::default()
                    };
                    push_entries(
                        &mut section,
                        EntryKind::Overview,
                        Some(&ctx),
                        std::slice::from_ref(&project.description),
                    );
                    push_entries(
                        &mut section,
                        EntryKind::Bullet,
                        Some(&ctx),
                        &project.achievements,
                    );
                }
            }
            SectionKind::Skills => {
                for group in &parsed.skills {
                    let category = clean(&group.category);
                    let ctx = (!category.is_empty()).then(|| EntryContext {
                        title: category,
                        ..Default::default()
                    });
                    push_entries(&mut section, EntryKind::Skill, ctx.as_ref(), &group.items);
                }
            }
            SectionKind::Education => {
                for edu in &parsed.education {
                    let ctx = EntryContext {
                        title: clean(&edu.degree),
                        organization: clean(&edu.institution),
                        period: clean(&edu.graduation),
                        location: clean(&edu.location),
                        technologies: Vec::new(),
                    };
                    let mut details = cleaned(&edu.details);
                    if details.is_empty() {
                        details.push(ctx.headline());
                    }
                    push_entries(&mut section, EntryKind::Detail, Some(&ctx), &details);
                }
            }
            SectionKind::Certifications => {
                let lines: Vec<String> = parsed
                    .certifications
                    .iter()
                    .map(|c| {
                        [&c.name, &c.issuer, &c.date]
                            .iter()
                            .map(|s| s.trim())
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect();
                push_entries(&mut section, EntryKind::Detail, None, &lines);
            }
            SectionKind::Achievements => {
                push_entries(&mut section, EntryKind::Bullet, None, &parsed.achievements);
            }
            SectionKind::Other => {}
        }
        if !section.entries.is_empty() {
            sections.push(section);
        }
    }
    (contact, sections)
}
