//! Drug-name search over the dataset.
//!
//! Pipeline: exact / substring / token match on drug name → substring on active
//! ingredient → fuzzy close-match fallback on drug name.

mod alternatives;
mod matcher;

pub use alternatives::*;
pub use matcher::*;

use serde::{Deserialize, Serialize};

use crate::dataset::{normalize_string, Dataset};
use crate::models::MedicineRecord;

/// Queries shorter than this (after trimming) return nothing.
const MIN_QUERY_CHARS: usize = 2;

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum number of records returned
    pub max_results: usize,
    /// Minimum similarity for the fuzzy fallback (0.0 - 1.0)
    pub fuzzy_cutoff: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            fuzzy_cutoff: 0.6,
        }
    }
}

/// Searches a borrowed dataset.
pub struct Searcher<'a> {
    dataset: &'a Dataset,
    options: SearchOptions,
}

impl<'a> Searcher<'a> {
    /// Create a searcher with default options.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_options(dataset, SearchOptions::default())
    }

    pub fn with_options(dataset: &'a Dataset, options: SearchOptions) -> Self {
        Self { dataset, options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Find records for a typed or OCR-extracted drug name.
    pub fn search(&self, name: &str) -> Vec<&'a MedicineRecord> {
        if name.trim().chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let query = normalize_string(name);
        if query.is_empty() {
            return Vec::new();
        }
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let direct: Vec<&'a MedicineRecord> = self
            .dataset
            .iter()
            .filter(|record| !record.is_unsearchable())
            .filter(|record| matches_record(record, &query, &tokens))
            .take(self.options.max_results)
            .collect();

        if !direct.is_empty() {
            tracing::debug!(query = %query, hits = direct.len(), "Direct match");
            return direct;
        }

        let fuzzy = self.fuzzy_fallback(&query);
        tracing::debug!(query = %query, hits = fuzzy.len(), "Fuzzy fallback");
        fuzzy
    }

    /// First search hit, if any.
    pub fn best_match(&self, name: &str) -> Option<&'a MedicineRecord> {
        self.search(name).into_iter().next()
    }

    fn fuzzy_fallback(&self, query: &str) -> Vec<&'a MedicineRecord> {
        let names = self.dataset.iter().map(|r| r.norm_drug.as_str());
        close_matches(query, names, self.options.max_results, self.options.fuzzy_cutoff)
            .into_iter()
            .filter_map(|name| self.dataset.iter().find(|r| r.norm_drug == name))
            .collect()
    }
}

/// Drug-name match (exact, substring, or every token a substring), else ingredient substring.
fn matches_record(record: &MedicineRecord, query: &str, tokens: &[&str]) -> bool {
    let drug = record.norm_drug.as_str();
    if drug == query || drug.contains(query) || tokens.iter().all(|t| drug.contains(t)) {
        return true;
    }
    record.norm_active.contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_dataset() -> Dataset {
        let raw = json!([
            {"Drug Name": "Napa", "Company Name": "Beximco", "Active Ingredient": "Paracetamol"},
            {"Drug Name": "Napa Extra", "Company Name": "Beximco", "Active Ingredient": "Paracetamol + Caffeine"},
            {"Drug Name": "Ace", "Company Name": "Square", "Active Ingredient": "Paracetamol"},
            {"Drug Name": "Seclo 20", "Company Name": "Square", "Active Ingredient": "Omeprazole"},
            {"Drug Name": "Losectil", "Company Name": "Eskayef", "Active Ingredient": "Omeprazole"},
            {"Company Name": "Nameless"}
        ]);
        let records = raw
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect();
        Dataset::from_records(records)
    }

    fn names(results: &[&MedicineRecord]) -> Vec<String> {
        results.iter().map(|r| r.drug_name.clone()).collect()
    }

    #[test]
    fn test_exact_match_first() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        let results = searcher.search("Napa");
        assert_eq!(names(&results), vec!["Napa", "Napa Extra"]);
    }

    #[test]
    fn test_token_subset_match() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        // Tokens out of order still match
        let results = searcher.search("extra napa");
        assert_eq!(names(&results), vec!["Napa Extra"]);
    }

    #[test]
    fn test_active_ingredient_match() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        let results = searcher.search("omeprazole");
        assert_eq!(names(&results), vec!["Seclo 20", "Losectil"]);
    }

    #[test]
    fn test_fuzzy_fallback() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        let results = searcher.search("Losectl");
        assert_eq!(names(&results).first().map(String::as_str), Some("Losectil"));
    }

    #[test]
    fn test_short_or_empty_query() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        assert!(searcher.search("").is_empty());
        assert!(searcher.search(" a ").is_empty());
        assert!(searcher.search("--").is_empty());
    }

    #[test]
    fn test_no_match() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        assert!(searcher.search("zzzzqqqq").is_empty());
    }

    #[test]
    fn test_max_results() {
        let dataset = setup_dataset();
        let searcher = Searcher::with_options(
            &dataset,
            SearchOptions {
                max_results: 1,
                ..SearchOptions::default()
            },
        );

        let results = searcher.search("paracetamol");
        assert_eq!(names(&results), vec!["Napa"]);
    }

    #[test]
    fn test_best_match() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        assert_eq!(searcher.best_match("seclo").map(|r| r.drug_name.as_str()), Some("Seclo 20"));
        assert!(searcher.best_match("x").is_none());
    }

    #[test]
    fn test_ingredient_substring_precedes_later_name_match() {
        let dataset = setup_dataset();
        let searcher = Searcher::new(&dataset);

        // "ace" is inside "paracetamol", and Napa comes first in the file
        let results = searcher.search("ace");
        assert_eq!(names(&results), vec!["Napa", "Napa Extra", "Ace"]);
    }
}
