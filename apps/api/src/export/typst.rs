//! Typst markup writer. All user text passes through `escape` so resume content
//! can never inject markup, comments or code.

use crate::export::document::{render_sections, Group};
use crate::export::markdown::display_name;
use crate::export::theme::{Theme, ThemeStyle};
use crate::models::resume::Resume;

/// Escapes text for Typst markup mode. A backslash before any non-whitespace
/// character produces that character literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let leading_digits = text.chars().take_while(|c| c.is_ascii_digit()).count();

    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' | '#' | '$' | '*' | '_' | '`' | '<' | '>' | '@' | '[' | ']' | '~' | '/' => {
                out.push('\\');
                out.push(c);
            }
            // List, heading and numbered-list markers only matter at line start.
            '=' | '-' | '+' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            '.' if leading_digits > 0 && i == leading_digits => {
                out.push('\\');
                out.push(c);
            }
            '\r' | '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for a Typst string literal.
fn string_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn render_typst(resume: &Resume, theme: Theme) -> String {
    let style = theme.style();
    let mut out = String::new();

    write_preamble(&mut out, resume, theme, &style);
    write_header(&mut out, resume, &style);

    for section in render_sections(resume) {
        out.push_str(&format!("== {}\n\n", escape(section.title)));
        for group in &section.groups {
            write_group(&mut out, group);
        }
    }

    format!("{}\n", out.trim_end())
}

fn write_preamble(out: &mut String, resume: &Resume, theme: Theme, style: &ThemeStyle) {
    let fonts: Vec<String> = style.fonts.iter().map(|f| string_literal(f)).collect();
    let heading_body = if style.uppercase_headings {
        "#upper(it.body)"
    } else {
        "#it.body"
    };
    let rule = if style.heading_rule {
        "\n  #v(-0.55em)\n  #line(length: 100%, stroke: 0.5pt + rgb(\"#b3b3b3\"))"
    } else {
        ""
    };

    out.push_str(&format!("// Theme: {}\n", theme.name()));
    out.push_str(&format!(
        "#set document(title: {})\n",
        string_literal(display_name(resume))
    ));
    out.push_str("#set page(paper: \"us-letter\", margin: (x: 0.7in, y: 0.6in))\n");
    out.push_str(&format!(
        "#set text(font: ({},), size: {}pt, fill: rgb(\"{}\"))\n",
        fonts.join(", "),
        style.body_size_pt,
        style.text_color
    ));
    out.push_str("#set par(leading: 0.55em)\n");
    out.push_str("#set list(indent: 0.6em)\n");
    out.push_str(&format!(
        "#show heading.where(level: 2): it => block(above: 1.1em, below: 0.5em, width: 100%)[\n  #text(fill: rgb(\"{}\"), size: 12pt, weight: \"bold\")[{heading_body}]{rule}\n]\n\n",
        style.accent_color
    ));
}

fn write_header(out: &mut String, resume: &Resume, style: &ThemeStyle) {
    let contact = &resume.contact;
    let mut lines = vec![format!(
        "#text(size: {}pt, weight: \"bold\")[{}]",
        style.name_size_pt,
        escape(display_name(resume))
    )];
    if !contact.title.is_empty() {
        lines.push(format!(
            "#text(fill: rgb(\"{}\"))[{}]",
            style.muted_color,
            escape(&contact.title)
        ));
    }
    let fields = contact.display_fields();
    if !fields.is_empty() {
        let joined: Vec<String> = fields.iter().map(|f| escape(f)).collect();
        lines.push(format!(
            "#text(fill: rgb(\"{}\"))[{}]",
            style.muted_color,
            joined.join(" | ")
        ));
    }

    let alignment = if style.centered_header { "center" } else { "left" };
    out.push_str(&format!(
        "#align({alignment})[\n  {}\n]\n\n",
        lines.join(" \\\n  ")
    ));
}

fn write_group(out: &mut String, group: &Group) {
    let skills_only = group.overviews.is_empty()
        && group.bullets.is_empty()
        && group.details.is_empty()
        && group.summary.is_empty();

    if let Some(ctx) = group.context.filter(|_| !skills_only) {
        let left: Vec<String> = [
            (!ctx.title.is_empty()).then(|| format!("*{}*", escape(&ctx.title))),
            (!ctx.organization.is_empty()).then(|| escape(&ctx.organization)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut lines = Vec::new();
        let mut first = left.join(" | ");
        if !ctx.period.is_empty() {
            first.push_str(&format!(" #h(1fr) {}", escape(&ctx.period)));
        }
        if !first.trim().is_empty() {
            lines.push(first);
        }
        if !ctx.location.is_empty() {
            lines.push(format!("_{}_", escape(&ctx.location)));
        }
        if !ctx.technologies.is_empty() {
            let techs: Vec<String> = ctx.technologies.iter().map(|t| escape(t)).collect();
            lines.push(format!("Technologies: {}", techs.join(", ")));
        }
        if !lines.is_empty() {
            out.push_str(&lines.join(" \\\n"));
            out.push_str("\n\n");
        }
    }

    if !group.summary.is_empty() {
        let sentences: Vec<String> = group.summary.iter().map(|s| escape(s)).collect();
        out.push_str(&sentences.join(" "));
        out.push_str("\n\n");
    }
    for overview in &group.overviews {
        out.push_str(&format!("{}\n\n", escape(overview)));
    }

    let items: Vec<&&str> = group.bullets.iter().chain(group.details.iter()).collect();
    if !items.is_empty() {
        for item in items {
            out.push_str(&format!("- {}\n", escape(item)));
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
                Some(label) => out.push_str(&format!("- *{}:* {}\n", escape(label), escape(skills))),
                None => out.push_str(&format!("- {}\n", escape(skills))),
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sample_resume;

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(
            escape("C# & 50% <fast> *bold* http://x.io @jane"),
            "C\\# & 50% \\<fast\\> \\*bold\\* http:\\/\\/x.io \\@jane"
        );
        assert_eq!(escape("$100 [draft] a_b ~x `y`"), "\\$100 \\[draft\\] a\\_b \\~x \\`y\\`");
    }

    #[test]
    fn test_escape_line_start_markers() {
        assert_eq!(escape("= heading"), "\\= heading");
        assert_eq!(escape("- item"), "\\- item");
        assert_eq!(escape("2020 - 2022"), "2020 - 2022");
        assert_eq!(escape("1. first"), "1\\. first");
        assert_eq!(escape("3.5 GPA"), "3\\.5 GPA");
        assert_eq!(escape("line\nbreak"), "line break");
    }

    #[test]
    fn test_render_professional() {
        let markup = render_typst(&sample_resume(), Theme::Professional);

        assert!(markup.starts_with("// Theme: professional\n#set document(title: \"Jane Doe\")"));
        assert!(markup.contains("#upper(it.body)"));
        assert!(markup.contains("#align(center)["));
        assert!(markup.contains("jane\\@example.com | (555) 123-4567"));
        assert!(markup.contains("== Professional Experience\n\n*Senior Engineer* | Acme #h(1fr) 2020 - Present \\\n_Remote_\n\n"));
        assert!(markup.contains("- Reduced latency by 40%\n"));
        assert!(markup.contains("- *Languages:* Rust, Go, SQL"));
        assert!(!markup.contains("== Languages"));
    }

    #[test]
    fn test_themes_differ() {
        let resume = sample_resume();
        let modern = render_typst(&resume, Theme::Modern);
        let minimal = render_typst(&resume, Theme::Minimal);

        assert!(modern.contains("#align(left)["));
        assert!(modern.contains("rgb(\"#0f766e\")"));
        assert!(!modern.contains("#upper"));
        assert!(!minimal.contains("#line(length: 100%"));
        assert_ne!(modern, minimal);
    }

    #[test]
    fn test_user_text_cannot_inject_code() {
        let mut resume = sample_resume();
        resume.sections[1].entries[1].variations[0].text = "#include \"/etc/passwd\"".to_string();
        let markup = render_typst(&resume, Theme::Minimal);
        assert!(markup.contains("- \\#include \"\\/etc\\/passwd\""));
    }
}
