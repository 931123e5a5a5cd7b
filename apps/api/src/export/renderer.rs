//! PDF rendering through the external `typst` CLI.
//!
//! The markup is written to a fresh temporary directory and compiled there; the
//! directory is removed when the render finishes, successful or not.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("typst rejected the generated markup: {stderr}")]
    Markup { stderr: String },

    #[error("renderer '{binary}' could not be started: {source}")]
    Unavailable {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer finished without producing a PDF")]
    MissingOutput,

    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),
}

/// Typst markup in, PDF bytes out.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, markup: &str) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone)]
pub struct TypstCliRenderer {
    binary: String,
    timeout: Duration,
}

impl TypstCliRenderer {
    pub fn new(binary: String) -> Self {
        Self {
            binary,
            timeout: RENDER_TIMEOUT,
        }
    }
}

#[async_trait]
impl PdfRenderer for TypstCliRenderer {
    async fn render_pdf(&self, markup: &str) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempfile::Builder::new()
            .prefix("resume-tailor-")
            .tempdir()?;

        let input_path: PathBuf = temp_dir.path().join("resume.typ");
        let output_path: PathBuf = temp_dir.path().join("resume.pdf");
        tokio::fs::write(&input_path, markup).await?;

        let mut command = Command::new(&self.binary);
        command
            .arg("compile")
            .arg(&input_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(RenderError::Unavailable {
                    binary: self.binary.clone(),
                    source,
                })
            }
            Err(_) => return Err(RenderError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("typst exited with {}: {stderr}", output.status);
            return Err(RenderError::Markup { stderr });
        }

        let pdf = match tokio::fs::read(&output_path).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Err(RenderError::MissingOutput),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::MissingOutput)
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        debug!("typst produced {} bytes", pdf.len());
        Ok(pdf)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let renderer = TypstCliRenderer::new("definitely-not-a-typst-binary".to_string());
        let err = renderer.render_pdf("= Hi").await.unwrap_err();
        assert!(matches!(err, RenderError::Unavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_markup_error() {
        let renderer = TypstCliRenderer::new("false".to_string());
        let err = renderer.render_pdf("= Hi").await.unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_output_is_missing_output() {
        let renderer = TypstCliRenderer::new("true".to_string());
        let err = renderer.render_pdf("= Hi").await.unwrap_err();
        assert!(matches!(err, RenderError::MissingOutput));
    }
}
