//! Raw text extraction from PDF and DOCX bytes. CPU-bound: callers run these
//! functions on the blocking pool.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{DocumentFormat, ParseError};

pub fn extract_text(format: DocumentFormat, data: &[u8]) -> Result<String, ParseError> {
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf_text(data)?,
        DocumentFormat::Docx => extract_docx_text(data)?,
    };
    Ok(normalize_lines(&raw))
}

fn extract_pdf_text(data: &[u8]) -> Result<String, ParseError> {
    // pdf-extract panics on some malformed font tables instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ParseError::Unreadable(format!(
            "PDF text extraction failed: {e}"
        ))),
        Err(_) => Err(ParseError::Unreadable(
            "PDF text extraction aborted on malformed content".to_string(),
        )),
    }
}

fn extract_docx_text(data: &[u8]) -> Result<String, ParseError> {
    let unreadable = |e: &dyn std::fmt::Display| ParseError::Unreadable(format!("DOCX: {e}"));

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| unreadable(&e))?;
    let mut document_file = archive
        .by_name("word/document.xml")
        .map_err(|e| unreadable(&e))?;
    let mut xml = String::new();
    document_file
        .read_to_string(&mut xml)
        .map_err(|e| unreadable(&e))?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if in_paragraph {
                    match e.name().as_ref() {
                        b"w:tab" => current.push(' '),
                        b"w:br" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content().map_err(|e| unreadable(&e))?;
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(unreadable(&err)),
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

/// Trims every line, collapses runs of internal whitespace and drops blank lines.
pub fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut out);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("word/document.xml", options).unwrap();
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
            );
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        out.into_inner()
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Experience</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Built</w:t></w:r><w:r><w:t xml:space=\"preserve\"> things</w:t></w:r></w:p>",
        );
        let text = extract_text(DocumentFormat::Docx, &data).unwrap();
        assert_eq!(text, "Jane Doe\nExperience\nBuilt things");
    }

    #[test]
    fn test_docx_without_document_xml_is_unreadable() {
        let mut out = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut out);
            writer
                .start_file(
                    "other.txt",
                    zip::write::SimpleFileOptions::default()
                        .compression_method(zip::CompressionMethod::Stored),
                )
                .unwrap();
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }
        let result = extract_text(DocumentFormat::Docx, &out.into_inner());
        assert!(matches!(result, Err(ParseError::Unreadable(_))));
    }

    #[test]
    fn test_garbage_pdf_is_unreadable() {
        let result = extract_text(DocumentFormat::Pdf, b"%PDF-1.4 not really a pdf");
        assert!(matches!(result, Err(ParseError::Unreadable(_))));
    }

    #[test]
    fn test_normalize_lines() {
        assert_eq!(normalize_lines("  a   b \n\n\t\n c "), "a b\nc");
    }
}
