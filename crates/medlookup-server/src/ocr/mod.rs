//! OCR engine adapter.
//!
//! Images arrive as base64 (optionally a `data:image/...;base64,` URL); the
//! engine returns the recognized text as trimmed, non-empty lines.

mod tesseract;

pub use tesseract::TesseractCli;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// OCR errors
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("OCR is not configured")]
    Disabled,

    #[error("Failed to start OCR engine '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR engine failed (exit code {code:?}): {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Reads text from image bytes.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognized text, one entry per line or paragraph.
    async fn read_text(&self, image: &[u8]) -> OcrResult<Vec<String>>;

    /// Engine label for logs.
    fn name(&self) -> &str;
}

/// Decode a base64 image, accepting a `data:image...,` prefix.
///
/// For data URLs only the segment after the first `,` and before any
/// following `,` is decoded. ASCII whitespace (line wrapping) is ignored.
pub fn decode_image_payload(payload: &str) -> OcrResult<Vec<u8>> {
    let payload = payload.trim();
    let encoded = if payload.starts_with("data:image") {
        payload
            .split(',')
            .nth(1)
            .ok_or_else(|| OcrError::InvalidPayload("data URL without ',' separator".into()))?
    } else {
        payload
    };

    let encoded: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if encoded.is_empty() {
        return Err(OcrError::InvalidPayload("empty image".into()));
    }

    STANDARD
        .decode(encoded)
        .map_err(|e| OcrError::InvalidPayload(e.to_string()))
}

/// Split engine output into trimmed, non-empty lines.
pub(crate) fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Engine used when no OCR backend is configured.
#[derive(Debug, Default, Clone)]
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn read_text(&self, _image: &[u8]) -> OcrResult<Vec<String>> {
        Err(OcrError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Mock engine returning fixed lines for any image (for testing).
#[derive(Debug, Default, Clone)]
pub struct StaticOcr {
    lines: Vec<String>,
}

impl StaticOcr {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl OcrEngine for StaticOcr {
    async fn read_text(&self, _image: &[u8]) -> OcrResult<Vec<String>> {
        Ok(self.lines.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
