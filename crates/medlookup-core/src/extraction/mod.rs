//! Drug-name extraction from OCR output.
//!
//! Two strategies:
//! - [`ExtractionStrategy::DosagePattern`]: `TAB <name> 1+0+1`, falling back to capitalized phrases
//! - [`ExtractionStrategy::FormPrefix`]: `TAB/CAP/INJ/SYR <NAME>` lines, title-cased

mod dosage;
mod form_prefix;

pub use dosage::*;
pub use form_prefix::*;

use serde::{Deserialize, Serialize};

use crate::models::ParsedMedicine;

/// OCR output: either one block of text or recognized lines/paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrText {
    Text(String),
    Lines(Vec<String>),
}

impl OcrText {
    pub fn lines(&self) -> &[String] {
        match self {
            OcrText::Text(text) => std::slice::from_ref(text),
            OcrText::Lines(lines) => lines,
        }
    }
}

impl From<&str> for OcrText {
    fn from(text: &str) -> Self {
        OcrText::Text(text.to_string())
    }
}

impl From<String> for OcrText {
    fn from(text: String) -> Self {
        OcrText::Text(text)
    }
}

impl From<Vec<String>> for OcrText {
    fn from(lines: Vec<String>) -> Self {
        OcrText::Lines(lines)
    }
}

impl From<&[&str]> for OcrText {
    fn from(lines: &[&str]) -> Self {
        OcrText::Lines(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// Drug names plus parsed mentions using the dosage-pattern strategy.
///
/// Both are empty when nothing was recognized.
pub fn extract_meds(text: impl Into<OcrText>) -> (Vec<String>, Vec<ParsedMedicine>) {
    let text = text.into();
    let parsed = parse_ocr_text(text.lines());
    let names = parsed.iter().map(|p| p.drug_name.clone()).collect();
    (names, parsed)
}

/// Which extractor the image pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    #[default]
    DosagePattern,
    FormPrefix,
}

impl ExtractionStrategy {
    /// Extract drug names from OCR lines.
    pub fn extract<S: AsRef<str>>(self, lines: &[S]) -> Vec<String> {
        let names = match self {
            ExtractionStrategy::DosagePattern => parse_ocr_text(lines)
                .into_iter()
                .map(|p| p.drug_name)
                .collect(),
            ExtractionStrategy::FormPrefix => extract_form_prefixed(lines),
        };
        tracing::debug!(strategy = ?self, lines = lines.len(), names = names.len(), "Extracted drug names");
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_meds_from_string() {
        let (names, parsed) = extract_meds("TAB Napa 500 1+0+1");
        assert_eq!(names, vec!["Napa 500"]);
        assert_eq!(parsed[0].dosage.as_deref(), Some("1+0+1"));
    }

    #[test]
    fn test_extract_meds_from_lines() {
        let lines: &[&str] = &["TAB Napa 1+0+1", "TAB Ace 0+1+0"];
        let (names, parsed) = extract_meds(lines);
        assert_eq!(names, vec!["Napa", "Ace"]);
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_extract_meds_nothing() {
        let (names, parsed) = extract_meds("");
        assert!(names.is_empty());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_strategy_dispatch() {
        let lines = ["TAB", "NAPA"];
        assert_eq!(ExtractionStrategy::FormPrefix.extract(&lines), vec!["Napa"]);
        // Dosage pattern finds no schedule, falls back to capitalized words
        assert_eq!(ExtractionStrategy::DosagePattern.extract(&lines), vec!["TAB NAPA"]);
    }

    #[test]
    fn test_strategy_serde() {
        let strategy: ExtractionStrategy = serde_json::from_str(r#""form_prefix""#).unwrap();
        assert_eq!(strategy, ExtractionStrategy::FormPrefix);
    }
}
