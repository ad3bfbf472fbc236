//! Static medicine dataset.

mod normalizer;

pub use normalizer::*;

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::models::{MedicineRecord, RawRecord};

/// Dataset errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// The full medicine dataset, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<MedicineRecord>,
}

impl Dataset {
    /// Load a JSON array of objects from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.display(),
            records = dataset.len(),
            "Loaded medicine dataset"
        );
        Ok(dataset)
    }

    /// Parse a JSON array of objects.
    pub fn from_json_str(json: &str) -> DatasetResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(DatasetError::InvalidFormat(format!(
                    "expected a JSON array at top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut raw_records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => raw_records.push(map),
                other => {
                    return Err(DatasetError::InvalidFormat(format!(
                        "entry {} is {}, expected an object",
                        index,
                        json_kind(&other)
                    )))
                }
            }
        }

        Ok(Self::from_records(raw_records))
    }

    /// Normalize already-parsed raw entries.
    pub fn from_records(raw: Vec<RawRecord>) -> Self {
        Self::from_records_with(raw, &RecordNormalizer::new())
    }

    /// Normalize raw entries with a custom normalizer.
    pub fn from_records_with(raw: Vec<RawRecord>, normalizer: &RecordNormalizer) -> Self {
        Self {
            records: raw.into_iter().map(|r| normalizer.normalize(r)).collect(),
        }
    }

    pub fn records(&self) -> &[MedicineRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MedicineRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MedicineRecord;
    type IntoIter = std::slice::Iter<'a, MedicineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"Drug Name": "Napa", "Company Name": "Beximco", "Active Ingredient": "Paracetamol"},
        {"Drug Name": "Ace", "Company Name": "Square", "Active Ingredient": "Paracetamol"}
    ]"#;

    #[test]
    fn test_from_json_str() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].drug_name, "Ace");
    }

    #[test]
    fn test_raw_key_order_preserved() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let keys: Vec<&str> = dataset.records()[0].raw.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Drug Name", "Company Name", "Active Ingredient"]);
    }

    #[test]
    fn test_rejects_non_array() {
        let result = Dataset::from_json_str(r#"{"Drug Name": "Napa"}"#);
        assert!(matches!(result, Err(DatasetError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_non_object_entry() {
        let result = Dataset::from_json_str(r#"[{"Drug Name": "Napa"}, "oops"]"#);
        match result {
            Err(DatasetError::InvalidFormat(msg)) => assert!(msg.contains("entry 1")),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = Dataset::from_json_str("[{");
        assert!(matches!(result, Err(DatasetError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Dataset::load("/nonexistent/medicine_data.json");
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_empty_array() {
        let dataset = Dataset::from_json_str("[]").unwrap();
        assert!(dataset.is_empty());
    }
}
