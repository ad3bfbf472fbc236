//! Dosage-form prefix extraction (TAB / CAP / INJ / SYR).

use std::sync::LazyLock;

use regex::Regex;

/// Dosage-form markers that start a prescription line.
pub const FORM_MARKERS: [&str; 4] = ["TAB", "CAP", "INJ", "SYR"];

static FORM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(TAB|CAP|INJ|SYR)\s*[-–]?\s*([A-Z\s]+)$").unwrap());

static NAME_ONLY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z\s]+$").unwrap());

fn is_form_marker(line: &str) -> bool {
    let upper = line.trim().to_uppercase();
    FORM_MARKERS.contains(&upper.as_str())
}

/// Rejoin a marker that OCR split from its drug name ("TAB", "NAPA" → "TAB NAPA").
pub fn group_form_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut grouped = Vec::with_capacity(lines.len());
    let mut iter = lines.iter().map(|l| l.as_ref()).peekable();

    while let Some(line) = iter.next() {
        if is_form_marker(line) {
            let mut joined = format!("{} ", line.trim());
            if let Some(next) = iter.next_if(|next| !is_form_marker(next)) {
                joined.push_str(next.trim());
            }
            grouped.push(joined.trim().to_string());
        } else {
            grouped.push(line.trim().to_string());
        }
    }

    grouped
}

/// Drug names from form-prefixed lines, title-cased.
///
/// Lines made only of letters and spaces are kept as names too.
pub fn extract_form_prefixed<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    group_form_lines(lines)
        .iter()
        .filter_map(|line| {
            if let Some(caps) = FORM_LINE.captures(line) {
                Some(title_case(caps[2].trim()))
            } else if NAME_ONLY_LINE.is_match(line) {
                Some(title_case(line.trim()))
            } else {
                None
            }
        })
        .collect()
}

/// Uppercase the first letter of each word, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
