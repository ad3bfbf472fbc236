//! Medicine dataset models.

use serde::{Deserialize, Serialize};

/// A dataset entry exactly as it appears in the JSON file (key order preserved).
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Canonical fields every dataset entry is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    DrugName,
    CompanyName,
    ActiveIngredient,
    Indication,
    DosageAndAdministration,
    SideEffects,
    UseInPregnancy,
}

impl CanonicalField {
    /// All canonical fields in dataset column order.
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::DrugName,
        CanonicalField::CompanyName,
        CanonicalField::ActiveIngredient,
        CanonicalField::Indication,
        CanonicalField::DosageAndAdministration,
        CanonicalField::SideEffects,
        CanonicalField::UseInPregnancy,
    ];

    /// Source column names accepted for this field, in priority order.
    pub fn key_variants(self) -> &'static [&'static str] {
        match self {
            CanonicalField::DrugName => &["drug name", "drug_name", "medicine", "name"],
            CanonicalField::CompanyName => &["company name", "manufacturer", "company"],
            CanonicalField::ActiveIngredient => &["active ingredient", "ingredient", "salt"],
            CanonicalField::Indication => &["indication", "use", "uses"],
            CanonicalField::DosageAndAdministration => {
                &["dosage and administration", "dosage", "dose"]
            }
            CanonicalField::SideEffects => &["side effects", "adverse effects"],
            CanonicalField::UseInPregnancy => &["use in pregnancy", "pregnancy safety"],
        }
    }
}

/// One medicine from the dataset, mapped onto canonical fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Brand/trade name (e.g., "Napa Extra")
    pub drug_name: String,
    /// Manufacturer
    pub company_name: String,
    /// Active ingredient / salt (e.g., "Paracetamol + Caffeine")
    pub active_ingredient: String,
    pub indication: String,
    pub dosage_and_administration: String,
    pub side_effects: String,
    pub use_in_pregnancy: String,
    /// Original entry, returned verbatim to clients
    pub raw: RawRecord,
    /// `drug_name` after [`crate::normalize_string`]
    pub norm_drug: String,
    /// `active_ingredient` after [`crate::normalize_string`]
    pub norm_active: String,
}

impl MedicineRecord {
    /// Value of a canonical field.
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::DrugName => &self.drug_name,
            CanonicalField::CompanyName => &self.company_name,
            CanonicalField::ActiveIngredient => &self.active_ingredient,
            CanonicalField::Indication => &self.indication,
            CanonicalField::DosageAndAdministration => &self.dosage_and_administration,
            CanonicalField::SideEffects => &self.side_effects,
            CanonicalField::UseInPregnancy => &self.use_in_pregnancy,
        }
    }

    fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::DrugName => &mut self.drug_name,
            CanonicalField::CompanyName => &mut self.company_name,
            CanonicalField::ActiveIngredient => &mut self.active_ingredient,
            CanonicalField::Indication => &mut self.indication,
            CanonicalField::DosageAndAdministration => &mut self.dosage_and_administration,
            CanonicalField::SideEffects => &mut self.side_effects,
            CanonicalField::UseInPregnancy => &mut self.use_in_pregnancy,
        }
    }

    /// Set a canonical field.
    pub fn set_field(&mut self, field: CanonicalField, value: String) {
        *self.field_mut(field) = value;
    }

    /// True when neither the drug name nor the ingredient can be searched.
    pub fn is_unsearchable(&self) -> bool {
        self.norm_drug.is_empty() && self.norm_active.is_empty()
    }
}
