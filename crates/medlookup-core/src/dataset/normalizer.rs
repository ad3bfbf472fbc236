//! Dataset key and value normalization.
//!
//! Handles:
//! - Search text folding ("Napa-Extra 500mg" → "napa extra 500mg")
//! - Column name variants ("Drug Name", "drug_name", "Medicine" → drug_name)
//! - Non-string cell values (numbers, lists) rendered as text

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{CanonicalField, MedicineRecord, RawRecord};

/// Lowercase, turn every run of non-alphanumeric characters into one space, trim.
pub fn normalize_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;

    for ch in s.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Column name with case and every non-alphanumeric character removed.
pub fn compact_key(key: &str) -> String {
    key.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Maps raw dataset entries onto [`MedicineRecord`].
pub struct RecordNormalizer {
    /// canonical field → compacted column names, in priority order
    variants: Vec<(CanonicalField, Vec<String>)>,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordNormalizer {
    /// Create a normalizer with the default column variants.
    pub fn new() -> Self {
        let variants = CanonicalField::ALL
            .iter()
            .map(|field| {
                let keys = field.key_variants().iter().map(|v| compact_key(v)).collect();
                (*field, keys)
            })
            .collect();
        Self { variants }
    }

    /// Accept an additional column name for a field (lowest priority).
    pub fn add_variant(&mut self, field: CanonicalField, column: &str) {
        if let Some((_, keys)) = self.variants.iter_mut().find(|(f, _)| *f == field) {
            keys.push(compact_key(column));
        }
    }

    /// Normalize one raw entry.
    pub fn normalize(&self, raw: RawRecord) -> MedicineRecord {
        let key_map: HashMap<String, &Value> =
            raw.iter().map(|(k, v)| (compact_key(k), v)).collect();

        let mut record = MedicineRecord::default();
        for (field, keys) in &self.variants {
            let value = keys
                .iter()
                .filter_map(|k| key_map.get(k))
                .find(|v| is_present(v))
                .map(|v| value_to_text(v))
                .unwrap_or_default();
            record.set_field(*field, value);
        }

        record.norm_drug = normalize_string(&record.drug_name);
        record.norm_active = normalize_string(&record.active_ingredient);
        record.raw = raw;
        record
    }
}

/// Whether a cell claims its column. Whitespace-only strings still do.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Render a JSON cell as display text. Null is empty.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("Napa Extra"), "napa extra");
        assert_eq!(normalize_string("  Napa-Extra  500mg "), "napa extra 500mg");
        assert_eq!(normalize_string("Seclo® 20"), "seclo 20");
        assert_eq!(normalize_string("A+B/C"), "a b c");
        assert_eq!(normalize_string("---"), "");
        assert_eq!(normalize_string(""), "");
    }

    #[test]
    fn test_compact_key() {
        assert_eq!(compact_key("Drug Name"), "drugname");
        assert_eq!(compact_key("drug_name"), "drugname");
        assert_eq!(compact_key("Use in pregnancy"), "useinpregnancy");
    }

    #[test]
    fn test_normalize_standard_columns() {
        let normalizer = RecordNormalizer::new();
        let record = normalizer.normalize(raw(json!({
            "Drug Name": "Napa",
            "Company Name": "Beximco",
            "Active Ingredient": "Paracetamol",
            "Indication": "Fever",
            "Dosage and Administration": "500mg every 6 hours",
            "Side Effects": "Rare",
            "Use in pregnancy": "Safe"
        })));

        assert_eq!(record.drug_name, "Napa");
        assert_eq!(record.company_name, "Beximco");
        assert_eq!(record.active_ingredient, "Paracetamol");
        assert_eq!(record.dosage_and_administration, "500mg every 6 hours");
        assert_eq!(record.use_in_pregnancy, "Safe");
        assert_eq!(record.norm_drug, "napa");
        assert_eq!(record.norm_active, "paracetamol");
        assert_eq!(record.raw.len(), 7);
    }

    #[test]
    fn test_normalize_variant_columns() {
        let normalizer = RecordNormalizer::new();
        let record = normalizer.normalize(raw(json!({
            "medicine": "Seclo",
            "Manufacturer": "Square",
            "salt": "Omeprazole",
            "uses": "Ulcer",
            "dose": "20mg daily",
            "Adverse Effects": "Headache",
            "Pregnancy Safety": "Consult doctor"
        })));

        assert_eq!(record.drug_name, "Seclo");
        assert_eq!(record.company_name, "Square");
        assert_eq!(record.active_ingredient, "Omeprazole");
        assert_eq!(record.indication, "Ulcer");
        assert_eq!(record.dosage_and_administration, "20mg daily");
        assert_eq!(record.side_effects, "Headache");
        assert_eq!(record.use_in_pregnancy, "Consult doctor");
    }

    #[test]
    fn test_empty_variant_falls_through() {
        let normalizer = RecordNormalizer::new();
        // "Drug Name" is empty, so "name" is used
        let record = normalizer.normalize(raw(json!({
            "Drug Name": "",
            "name": "Fallback"
        })));
        assert_eq!(record.drug_name, "Fallback");
    }

    #[test]
    fn test_blank_variant_keeps_its_column() {
        let normalizer = RecordNormalizer::new();
        let record = normalizer.normalize(raw(json!({
            "Drug Name": "Napa",
            "Indication": " ",
            "use": "Fever",
            "Dosage": null,
            "dose": "500mg",
            "Side Effects": [],
            "Adverse Effects": "Rash"
        })));

        assert_eq!(record.indication, "");
        assert_eq!(record.dosage_and_administration, "500mg");
        assert_eq!(record.side_effects, "Rash");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let normalizer = RecordNormalizer::new();
        let record = normalizer.normalize(raw(json!({ "Drug Name": "Napa" })));

        assert_eq!(record.company_name, "");
        assert_eq!(record.norm_active, "");
    }

    #[test]
    fn test_non_string_values() {
        let normalizer = RecordNormalizer::new();
        let record = normalizer.normalize(raw(json!({
            "Drug Name": "Napa",
            "Side Effects": ["Nausea", "Rash"],
            "Dosage": 500,
            "Indication": null
        })));

        assert_eq!(record.side_effects, "Nausea, Rash");
        assert_eq!(record.dosage_and_administration, "500");
        assert_eq!(record.indication, "");
    }

    #[test]
    fn test_custom_variant() {
        let mut normalizer = RecordNormalizer::new();
        normalizer.add_variant(CanonicalField::DrugName, "Brand");

        let record = normalizer.normalize(raw(json!({ "brand": "Ace" })));
        assert_eq!(record.drug_name, "Ace");
    }
}
