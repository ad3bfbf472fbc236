//! Alternative medicines sharing an active ingredient.

use serde_json::Value;

use crate::dataset::Dataset;
use crate::models::{MedicineRecord, RawRecord};

/// Key under which alternatives are attached to a retrieved record.
pub const ALTERNATIVES_KEY: &str = "Alternative Medicines";

/// Shown in place of an empty alternatives list.
pub const NO_ALTERNATIVES_MESSAGE: &str = "🙏 No alternates available in my dataset";

/// Default number of alternatives returned.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// Other medicines with the same active ingredient (case-insensitive), in dataset order.
pub fn alternatives_for<'a>(
    dataset: &'a Dataset,
    record: &MedicineRecord,
    max_results: usize,
) -> Vec<&'a MedicineRecord> {
    let main_active = record.active_ingredient.to_lowercase();
    if main_active.is_empty() {
        return Vec::new();
    }
    let main_drug = record.drug_name.to_lowercase();

    dataset
        .iter()
        .filter(|other| !other.drug_name.is_empty())
        .filter(|other| other.active_ingredient.to_lowercase() == main_active)
        .filter(|other| other.drug_name.to_lowercase() != main_drug)
        .take(max_results)
        .collect()
}

/// The raw record with its alternatives attached.
///
/// An empty list becomes a single placeholder entry.
pub fn with_alternatives(record: &MedicineRecord, alternatives: &[&MedicineRecord]) -> RawRecord {
    let alts: Vec<Value> = if alternatives.is_empty() {
        let mut placeholder = RawRecord::new();
        placeholder.insert("Drug Name".into(), Value::String(NO_ALTERNATIVES_MESSAGE.into()));
        vec![Value::Object(placeholder)]
    } else {
        alternatives
            .iter()
            .map(|a| Value::Object(a.raw.clone()))
            .collect()
    };

    let mut out = record.raw.clone();
    out.insert(ALTERNATIVES_KEY.into(), Value::Array(alts));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_dataset() -> Dataset {
        Dataset::from_json_str(
            &json!([
                {"Drug Name": "Napa", "Active Ingredient": "Paracetamol"},
                {"Drug Name": "Ace", "Active Ingredient": "paracetamol"},
                {"Drug Name": "NAPA", "Active Ingredient": "Paracetamol"},
                {"Drug Name": "Renova", "Active Ingredient": "Paracetamol"},
                {"Drug Name": "Fast", "Active Ingredient": "Paracetamol"},
                {"Drug Name": "Xpa", "Active Ingredient": "Paracetamol"},
                {"Drug Name": "Seclo", "Active Ingredient": "Omeprazole"},
                {"Active Ingredient": "Paracetamol"},
                {"Drug Name": "Mystery"}
            ])
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_same_ingredient_excluding_self() {
        let dataset = setup_dataset();
        let napa = &dataset.records()[0];

        let alts = alternatives_for(&dataset, napa, DEFAULT_MAX_ALTERNATIVES);
        let names: Vec<&str> = alts.iter().map(|a| a.drug_name.as_str()).collect();

        // "NAPA" is the same drug name in a different case
        assert_eq!(names, vec!["Ace", "Renova", "Fast"]);
    }

    #[test]
    fn test_no_ingredient_no_alternatives() {
        let dataset = setup_dataset();
        let mystery = &dataset.records()[8];

        assert!(alternatives_for(&dataset, mystery, 3).is_empty());
    }

    #[test]
    fn test_unique_ingredient() {
        let dataset = setup_dataset();
        let seclo = &dataset.records()[6];

        assert!(alternatives_for(&dataset, seclo, 3).is_empty());
    }

    #[test]
    fn test_with_alternatives_attaches_raw_entries() {
        let dataset = setup_dataset();
        let napa = &dataset.records()[0];
        let alts = alternatives_for(&dataset, napa, 2);

        let out = with_alternatives(napa, &alts);
        assert_eq!(out["Drug Name"], json!("Napa"));
        assert_eq!(
            out[ALTERNATIVES_KEY],
            json!([
                {"Drug Name": "Ace", "Active Ingredient": "paracetamol"},
                {"Drug Name": "Renova", "Active Ingredient": "Paracetamol"}
            ])
        );
    }

    #[test]
    fn test_with_alternatives_placeholder() {
        let dataset = setup_dataset();
        let seclo = &dataset.records()[6];

        let out = with_alternatives(seclo, &[]);
        assert_eq!(
            out[ALTERNATIVES_KEY],
            json!([{ "Drug Name": NO_ALTERNATIVES_MESSAGE }])
        );
    }
}
