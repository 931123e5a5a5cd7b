//! Render-ready view of a resume: selected text only, consecutive entries that
//! share a context grouped under one header. Shared by the Markdown and Typst
//! writers.

use crate::models::resume::{EntryContext, EntryKind, Resume, SectionKind};

#[derive(Debug, Default)]
pub struct Group<'a> {
    pub context: Option<&'a EntryContext>,
    pub overviews: Vec<&'a str>,
    pub bullets: Vec<&'a str>,
    pub details: Vec<&'a str>,
    pub summary: Vec<&'a str>,
    pub skills: Vec<&'a str>,
}

#[derive(Debug)]
pub struct RenderSection<'a> {
    pub kind: SectionKind,
    pub title: &'a str,
    pub groups: Vec<Group<'a>>,
}

/// Builds the render view. Entries without a selected variation are skipped;
/// export pre-checks that there are none.
pub fn render_sections(resume: &Resume) -> Vec<RenderSection<'_>> {
    resume
        .sections
        .iter()
        .filter_map(|section| {
            let mut groups: Vec<Group> = Vec::new();
            for entry in &section.entries {
                let Some(selected) = entry.selected_variation() else {
                    continue;
                };
                let same_context = groups
                    .last()
                    .is_some_and(|g| g.context == entry.context.as_ref());
                if !same_context {
                    groups.push(Group {
                        context: entry.context.as_ref(),
                        ..Default::default()
                    });
                }
                let Some(group) = groups.last_mut() else {
                    continue;
                };
                let text = selected.text.as_str();
                match entry.kind {
                    EntryKind::Summary => group.summary.push(text),
                    EntryKind::Overview => group.overviews.push(text),
                    EntryKind::Bullet => group.bullets.push(text),
                    EntryKind::Skill => group.skills.push(text),
                    EntryKind::Detail => group.details.push(text),
                }
            }
            (!groups.is_empty()).then_some(RenderSection {
                kind: section.kind,
                title: section.title.as_str(),
                groups,
            })
        })
        .collect()
}

/// Lowercase ASCII slug for file names; falls back to "resume".
pub fn slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume".to_string()
    } else {
        slug
    }
}
