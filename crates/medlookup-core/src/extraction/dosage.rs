//! `TAB <name> <schedule>` extraction.
//!
//! Prescriptions written as "TAB Napa 500 1+0+1" give both the drug name and
//! the morning+noon+night schedule. When no such line exists, capitalized
//! phrases are taken as candidate names instead.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ParsedMedicine;

static TAB_SCHEDULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTAB\b\s+(.+?)\s+([0-9](?:[+\-][0-9]){2})").unwrap());

static CAPITALIZED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][A-Za-z0-9\-]+(?:\s+[A-Z][A-Za-z0-9\-]+)*)\b").unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Candidate phrases this short are dropped.
const MIN_FALLBACK_CHARS: usize = 3;

/// Parse OCR lines into medicine mentions.
pub fn parse_ocr_text<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedMedicine> {
    if lines.is_empty() {
        return Vec::new();
    }
    let full_text = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    let scheduled: Vec<ParsedMedicine> = TAB_SCHEDULE
        .captures_iter(&full_text)
        .filter_map(|caps| {
            let name = WHITESPACE.replace_all(&caps[1], " ");
            let name = name.trim();
            // "TAB \t 1+0+1" can capture whitespace only
            (!name.is_empty()).then(|| ParsedMedicine::with_dosage(name, &caps[2]))
        })
        .collect();

    if !scheduled.is_empty() {
        return scheduled;
    }

    CAPITALIZED_PHRASE
        .captures_iter(&full_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| name.chars().count() >= MIN_FALLBACK_CHARS)
        .map(ParsedMedicine::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_schedule_lines() {
        let lines = [
            "Dr. Rahman MBBS",
            "TAB Napa 500 1+0+1",
            "TAB Seclo 20 0+0+1",
        ];
        let parsed = parse_ocr_text(&lines);

        assert_eq!(
            parsed,
            vec![
                ParsedMedicine::with_dosage("Napa 500", "1+0+1"),
                ParsedMedicine::with_dosage("Seclo 20", "0+0+1"),
            ]
        );
    }

    #[test]
    fn test_tab_case_insensitive_and_dash_schedule() {
        let parsed = parse_ocr_text(&["tab   Ace   Plus 1-1-1"]);
        assert_eq!(parsed, vec![ParsedMedicine::with_dosage("Ace Plus", "1-1-1")]);
    }

    #[test]
    fn test_tab_split_across_lines() {
        // OCR often breaks the name and schedule onto separate lines
        let parsed = parse_ocr_text(&["TAB", "Losectil 20", "1+0+0"]);
        assert_eq!(parsed, vec![ParsedMedicine::with_dosage("Losectil 20", "1+0+0")]);
    }

    #[test]
    fn test_tab_must_be_whole_word() {
        // "TABLET" is not the TAB marker; falls back to capitalized phrases
        let parsed = parse_ocr_text(&["TABLET napa 1+0+1"]);
        assert_eq!(parsed, vec![ParsedMedicine::new("TABLET")]);
    }

    #[test]
    fn test_capitalized_fallback() {
        let parsed = parse_ocr_text(&["take Napa Extra after meal", "and Seclo at night", "Rx"]);
        let names: Vec<&str> = parsed.iter().map(|p| p.drug_name.as_str()).collect();

        // "Rx" is too short
        assert_eq!(names, vec!["Napa Extra", "Seclo"]);
        assert!(parsed.iter().all(|p| p.dosage.is_none()));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert!(parse_ocr_text(&empty).is_empty());
        assert!(parse_ocr_text(&["all lowercase text 123"]).is_empty());
    }
}
