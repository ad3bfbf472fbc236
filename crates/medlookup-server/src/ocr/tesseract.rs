//! Tesseract via its command-line binary.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{text_lines, OcrEngine, OcrError, OcrResult};

/// Runs `tesseract stdin stdout -l <lang>` per image.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: String,
    lang: String,
}

impl TesseractCli {
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

#[async_trait]
impl OcrEngine for TesseractCli {
    async fn read_text(&self, image: &[u8]) -> OcrResult<Vec<String>> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OcrError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        // Tesseract reads the whole image before writing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OcrError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let lines = text_lines(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(engine = "tesseract", lang = %self.lang, lines = lines.len(), "OCR complete");
        Ok(lines)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
