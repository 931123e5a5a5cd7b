// Exporter: renders a resume's selected variations as Markdown, Typst source or
// PDF. PDF typesetting is delegated to the typst CLI through `PdfRenderer`.

pub mod document;
pub mod handlers;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod typst;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::renderer::PdfRenderer;
use crate::export::theme::{ExportFormat, Theme};
use crate::models::resume::Resume;

/// A rendered document. Derived from a resume snapshot and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub theme: Theme,
    pub file_name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

/// Renders `resume` in the requested format.
///
/// Fails with `IncompleteSelection` unless every entry has exactly one
/// selected variation that exists. No partial output is returned.
pub async fn export_resume(
    renderer: &dyn PdfRenderer,
    resume: &Resume,
    theme: Theme,
    format: ExportFormat,
) -> Result<ExportArtifact, AppError> {
    let unselected = resume.unselected_entries();
    if !unselected.is_empty() {
        return Err(AppError::IncompleteSelection(unselected));
    }

    let content = match format {
        ExportFormat::Markdown => markdown::render_markdown(resume).into_bytes(),
        ExportFormat::Typst => typst::render_typst(resume, theme).into_bytes(),
        ExportFormat::Pdf => {
            let markup = typst::render_typst(resume, theme);
            renderer.render_pdf(&markup).await?
        }
    };

    let file_name = format!(
        "{}-resume.{}",
        document::slug(&resume.name),
        format.extension()
    );
    info!(
        "Exported resume {} as {file_name} ({} bytes, theme {})",
        resume.id,
        content.len(),
        theme.name()
    );

    Ok(ExportArtifact {
        format,
        theme,
        file_name,
        content,
        generated_at: Utc::now(),
    })
}

/// Jane Doe with a two-sentence summary, one role (overview and bullet) and
/// one categorised skill group, every entry selected.
#[cfg(test)]
pub(crate) fn sample_resume() -> Resume {
    use crate::models::resume::{ContactInfo, Entry, EntryContext, EntryKind, Section, SectionKind};

    let contact = ContactInfo {
        name: "Jane Doe".to_string(),
        title: "Backend Engineer".to_string(),
        email: "jane@example.com".to_string(),
        phone: "(555) 123-4567".to_string(),
        ..Default::default()
    };
    let mut summary = Section::new(SectionKind::Summary);
    summary.entries = vec![
        Entry::from_text(EntryKind::Summary, None, "Backend engineer."),
        Entry::from_text(EntryKind::Summary, None, "Ships reliable systems."),
    ];
    let role = EntryContext {
        title: "Senior Engineer".to_string(),
        organization: "Acme".to_string(),
        period: "2020 - Present".to_string(),
        location: "Remote".to_string(),
        ..Default::default()
    };
    let mut experience = Section::new(SectionKind::Experience);
    experience.entries = vec![
        Entry::from_text(EntryKind::Overview, Some(role.clone()), "Owned the billing platform."),
        Entry::from_text(EntryKind::Bullet, Some(role), "Reduced latency by 40%"),
    ];
    let mut skills = Section::new(SectionKind::Skills);
    let languages = EntryContext {
        title: "Languages".to_string(),
        ..Default::default()
    };
    skills.entries = vec![Entry::from_text(
        EntryKind::Skill,
        Some(languages),
        "Rust, Go, SQL",
    )];
    Resume::new(contact, vec![summary, experience, skills])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::renderer::fake::FakeRenderer;

    #[tokio::test]
    async fn test_incomplete_selection_lists_entries() {
        let mut resume = sample_resume();
        let bullet = resume.sections[1].entries[1].id;
        resume.entry_mut(bullet).unwrap().clear_selection();
        let renderer = FakeRenderer::default();

        let err = export_resume(&renderer, &resume, Theme::Professional, ExportFormat::Pdf)
            .await
            .unwrap_err();

        match err {
            AppError::IncompleteSelection(ids) => assert_eq!(ids, vec![bullet]),
            other => panic!("expected IncompleteSelection, got {other:?}"),
        }
        assert!(renderer.markup.lock().unwrap().is_empty(), "renderer not called");
    }

    #[tokio::test]
    async fn test_pdf_export_renders_typst_markup() {
        let renderer = FakeRenderer::default();
        let artifact = export_resume(&renderer, &sample_resume(), Theme::Modern, ExportFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(artifact.file_name, "jane-doe-resume.pdf");
        assert!(artifact.content.starts_with(b"%PDF"));
        let markup = renderer.markup.lock().unwrap();
        assert_eq!(markup.len(), 1);
        assert!(markup[0].starts_with("// Theme: modern"));
    }

    #[tokio::test]
    async fn test_markdown_export_skips_renderer() {
        let renderer = FakeRenderer::default();
        let artifact = export_resume(
            &renderer,
            &sample_resume(),
            Theme::Professional,
            ExportFormat::Markdown,
        )
        .await
        .unwrap();

        assert_eq!(artifact.file_name, "jane-doe-resume.md");
        assert!(String::from_utf8(artifact.content).unwrap().starts_with("# Jane Doe"));
        assert!(renderer.markup.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_surfaces_as_render_error() {
        let renderer = FakeRenderer {
            fail: true,
            ..Default::default()
        };
        let err = export_resume(&renderer, &sample_resume(), Theme::Minimal, ExportFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
