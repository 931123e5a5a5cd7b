/// Document Parser — turns an uploaded PDF or DOCX into a structured Resume.
///
/// Pipeline: detect format → extract text (blocking pool) → contact fields →
/// sections. Structuring is rule-based by default; callers may pass a
/// `TextGenerator` to try AI structuring first, which falls back to the rules
/// on any service or JSON failure.
pub mod ai;
pub mod contact;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod sections;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::TextGenerator;
use crate::models::resume::{ContactInfo, Resume};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file could not be read: {0}")]
    Unreadable(String),

    #[error("no text could be extracted from the document")]
    EmptyDocument,

    #[error("no recognizable resume sections found")]
    NoSections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the file extension, falling back to magic bytes.
    pub fn detect(file_name: &str, data: &[u8]) -> Result<Self, ParseError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => return Ok(DocumentFormat::Pdf),
            Some("docx") => return Ok(DocumentFormat::Docx),
            _ => {}
        }
        if data.starts_with(b"%PDF") {
            Ok(DocumentFormat::Pdf)
        } else if data.starts_with(b"PK\x03\x04") {
            Ok(DocumentFormat::Docx)
        } else {
            Err(ParseError::UnsupportedFormat(file_name.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMethod {
    RuleBased,
    Ai,
    /// AI structuring was requested but failed; rule-based output was used.
    AiFallback,
}

#[derive(Debug)]
pub struct ParseOutcome {
    pub resume: Resume,
    pub format: DocumentFormat,
    pub method: ParseMethod,
}

/// Parses an uploaded resume file into a new (unsaved) Resume.
pub async fn parse_resume(
    file_name: &str,
    data: Vec<u8>,
    ai: Option<&dyn TextGenerator>,
) -> Result<ParseOutcome, ParseError> {
    let format = DocumentFormat::detect(file_name, &data)?;

    let text = tokio::task::spawn_blocking(move || extract::extract_text(format, &data))
        .await
        .map_err(|e| ParseError::Unreadable(format!("extraction task failed: {e}")))??;

    if text.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    info!(
        "Extracted {} characters from {file_name} ({format:?})",
        text.len()
    );

    let (resume, method) = match ai {
        Some(generator) => match ai::ai_structure(generator, &text).await {
            Ok((contact, sections)) if !sections.is_empty() => {
                (Resume::new(merge_contact(contact, &text), sections), ParseMethod::Ai)
            }
            Ok(_) => {
                warn!("AI parsing returned no sections, falling back to rule-based parsing");
                (rule_based(&text)?, ParseMethod::AiFallback)
            }
            Err(e) => {
                warn!("AI parsing failed: {e}, falling back to rule-based parsing");
                (rule_based(&text)?, ParseMethod::AiFallback)
            }
        },
        None => (rule_based(&text)?, ParseMethod::RuleBased),
    };

    info!(
        "Parsed resume '{}' with {} sections ({method:?})",
        resume.name,
        resume.sections.len()
    );
    Ok(ParseOutcome {
        resume,
        format,
        method,
    })
}

/// Rule-based structuring of already-extracted text.
pub fn rule_based(text: &str) -> Result<Resume, ParseError> {
    let sections = sections::structure_sections(text);
    if sections.is_empty() {
        return Err(ParseError::NoSections);
    }
    Ok(Resume::new(contact::extract_contact(text), sections))
}

/// Fills contact fields the model left blank from regex extraction.
fn merge_contact(mut contact: ContactInfo, text: &str) -> ContactInfo {
    let found = contact::extract_contact(text);
    for (slot, value) in [
        (&mut contact.name, found.name),
        (&mut contact.email, found.email),
        (&mut contact.phone, found.phone),
        (&mut contact.linkedin, found.linkedin),
        (&mut contact.github, found.github),
        (&mut contact.website, found.website),
    ] {
        if slot.is_empty() {
            *slot = value;
        }
    }
    contact
}

/// Minimal DOCX resume used by parser and router tests.
#[cfg(test)]
pub(crate) fn sample_docx() -> Vec<u8> {
    use std::io::{Cursor, Write};

    let paragraphs = [
        "Jane Doe",
        "jane@example.com | (555) 123-4567",
        "Summary",
        "Backend engineer focused on reliability.",
        "Experience",
        "Senior Engineer | Acme | 2020 - Present",
        "• Reduced latency by 40%",
        "Skills",
        "Rust, Go, SQL",
    ];
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut out = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut out);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    out.into_inner()
}
