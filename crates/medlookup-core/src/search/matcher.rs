//! Approximate string matching for the search fallback.

use strsim::{jaro_winkler, normalized_levenshtein};

/// Compute fuzzy string similarity using combined metrics.
pub fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler catches OCR/typing slips near the start, Levenshtein overall shape
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

/// Best candidates scoring at least `cutoff` against `query`, best first.
///
/// Each distinct candidate string appears once. Equal scores keep candidate order.
pub fn close_matches<'c, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut seen = std::collections::HashSet::new();
    let mut scored: Vec<(f64, &'c str)> = candidates
        .into_iter()
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .map(|c| (fuzzy_match(query, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    // Stable sort: ties stay in dataset order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("paracetamol", "paracetamol") > 0.99);
        assert!(fuzzy_match("paracetamol", "paracetmol") > 0.85); // OCR drop
        assert!(fuzzy_match("paracetamol", "omeprazole") < 0.6);
        assert_eq!(fuzzy_match("", "napa"), 0.0);
    }

    #[test]
    fn test_close_matches_ranked() {
        let candidates = ["seclo", "sergel", "napa", "seclo"];
        let matches = close_matches("secl", candidates, 5, 0.6);

        assert_eq!(matches.first(), Some(&"seclo"));
        // Duplicates collapse
        assert_eq!(matches.iter().filter(|m| **m == "seclo").count(), 1);
        assert!(!matches.contains(&"napa"));
    }

    #[test]
    fn test_close_matches_limit_and_cutoff() {
        let candidates = ["napa", "napa extra", "napa rapid"];
        assert_eq!(close_matches("napa", candidates, 1, 0.6), vec!["napa"]);
        assert!(close_matches("zzzz", candidates, 5, 0.6).is_empty());
        assert!(close_matches("napa", candidates, 0, 0.0).is_empty());
    }
}
