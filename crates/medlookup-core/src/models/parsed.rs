//! Medicine mentions parsed from prescription text.

use serde::{Deserialize, Serialize};

/// A drug name read off a prescription, with its dosing schedule when one was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedMedicine {
    /// Drug name as written (whitespace collapsed)
    pub drug_name: String,
    /// Dosing schedule such as "1+0+1" (morning+noon+night)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

impl ParsedMedicine {
    pub fn new(drug_name: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            dosage: None,
        }
    }

    pub fn with_dosage(drug_name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            dosage: Some(dosage.into()),
        }
    }
}
