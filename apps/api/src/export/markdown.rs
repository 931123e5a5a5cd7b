//! Markdown writer. Theme-independent: Markdown carries structure, not styling.

use crate::export::document::{render_sections, Group};
use crate::models::resume::Resume;

pub fn render_markdown(resume: &Resume) -> String {
    let mut out = String::new();
    let contact = &resume.contact;

    out.push_str(&format!("# {}\n\n", display_name(resume)));
    if !contact.title.is_empty() {
        out.push_str(&format!("*{}*\n\n", contact.title));
    }
    let fields = contact.display_fields();
    if !fields.is_empty() {
        out.push_str(&fields.join(" | "));
        out.push_str("\n\n");
    }

    for section in render_sections(resume) {
        out.push_str(&format!("## {}\n\n", section.title));
        for group in &section.groups {
            write_group(&mut out, group);
        }
    }

    format!("{}\n", out.trim_end())
}

pub(crate) fn display_name(resume: &Resume) -> &str {
    if resume.contact.name.trim().is_empty() {
        resume.name.as_str()
    } else {
        resume.contact.name.trim()
    }
}

fn write_group(out: &mut String, group: &Group) {
    let skills_only = group.overviews.is_empty()
        && group.bullets.is_empty()
        && group.details.is_empty()
        && group.summary.is_empty();

    if let Some(ctx) = group.context.filter(|_| !skills_only) {
        let headline = ctx.headline();
        if !headline.is_empty() {
            out.push_str(&format!("### {headline}\n\n"));
        }
        if !ctx.location.is_empty() {
            out.push_str(&format!("*{}*\n\n", ctx.location));
        }
        if !ctx.technologies.is_empty() {
            out.push_str(&format!(
                "**Technologies:** {}\n\n",
                ctx.technologies.join(", ")
            ));
        }
    }

    if !group.summary.is_empty() {
        out.push_str(&group.summary.join(" "));
        out.push_str("\n\n");
    }
    for overview in &group.overviews {
        out.push_str(&format!("{overview}\n\n"));
    }

    let items: Vec<&&str> = group.bullets.iter().chain(group.details.iter()).collect();
    if !items.is_empty() {
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
        out.push('\n');
    }

    if !group.skills.is_empty() {
        let label = group
            .context
            .map(|c| c.title.as_str())
            .filter(|t| !t.is_empty());
        for skills in &group.skills {
            match label {
                Some(label) => out.push_str(&format!("- **{label}:** {skills}\n")),
                None => out.push_str(&format!("- {skills}\n")),
            }
        }
        out.push('\n');
    }
}
