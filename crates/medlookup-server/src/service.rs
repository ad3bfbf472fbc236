//! Lookup pipeline: names or prescription image in, summaries and records out.

use std::sync::Arc;

use medlookup_core::search::{alternatives_for, with_alternatives, DEFAULT_MAX_ALTERNATIVES};
use medlookup_core::{
    Dataset, ExtractionStrategy, MedicineRecord, RawRecord, SearchOptions, Searcher,
};
use medlookup_llm::{is_incomplete, GenerationError, Summarizer, DEFAULT_REGENERATE_ATTEMPTS};
use serde::Serialize;
use thiserror::Error;

use crate::ocr::{decode_image_payload, OcrEngine, OcrError};

pub const NO_NAME_PROVIDED: &str = "No medicine name provided";
pub const NO_VALID_MEDICINE: &str = "No valid medicine found";
pub const NO_MEDICINES_DETECTED: &str = "No medicines detected.";
pub const NO_MATCHING_MEDICINES: &str = "No matching medicines found in dataset.";
pub const MEDICINE_NOT_FOUND: &str = "Medicine not found";

/// Service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request itself is unusable
    #[error("{0}")]
    Rejected(String),

    /// Nothing in the dataset matched
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid image: {0}")]
    BadImage(String),

    #[error("OCR failed: {0}")]
    Ocr(OcrError),

    #[error("Summary generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl From<OcrError> for ServiceError {
    fn from(e: OcrError) -> Self {
        match e {
            OcrError::InvalidPayload(msg) => ServiceError::BadImage(msg),
            other => ServiceError::Ocr(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One generated summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub drug_name: String,
    pub summary: String,
    /// Too short to be trusted as a full summary
    pub incomplete: bool,
}

impl SummaryEntry {
    pub fn new(drug_name: impl Into<String>, summary: String) -> Self {
        Self {
            drug_name: drug_name.into(),
            incomplete: is_incomplete(&summary),
            summary,
        }
    }
}

/// Summaries plus the retrieved raw records (with alternatives attached).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lookup {
    /// Names read from the image, for image lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<Vec<String>>,
    pub summaries: Vec<SummaryEntry>,
    pub retrieved: Vec<RawRecord>,
}

/// Dataset, summarizer and OCR engine wired together.
pub struct LookupService {
    dataset: Dataset,
    summarizer: Summarizer,
    ocr: Arc<dyn OcrEngine>,
    search: SearchOptions,
    max_alternatives: usize,
    strategy: ExtractionStrategy,
    regenerate_attempts: usize,
}

impl LookupService {
    pub fn new(dataset: Dataset, summarizer: Summarizer, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            dataset,
            summarizer,
            ocr,
            search: SearchOptions::default(),
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            strategy: ExtractionStrategy::default(),
            regenerate_attempts: DEFAULT_REGENERATE_ATTEMPTS,
        }
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search = options;
        self
    }

    pub fn with_max_alternatives(mut self, max_alternatives: usize) -> Self {
        self.max_alternatives = max_alternatives;
        self
    }

    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_regenerate_attempts(mut self, attempts: usize) -> Self {
        self.regenerate_attempts = attempts;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn ocr(&self) -> &dyn OcrEngine {
        self.ocr.as_ref()
    }

    fn first_hit(&self, name: &str) -> Option<&MedicineRecord> {
        Searcher::with_options(&self.dataset, self.search).best_match(name)
    }

    fn retrieved(&self, record: &MedicineRecord) -> RawRecord {
        let alternatives = alternatives_for(&self.dataset, record, self.max_alternatives);
        with_alternatives(record, &alternatives)
    }

    async fn describe(&self, record: &MedicineRecord) -> ServiceResult<(SummaryEntry, RawRecord)> {
        let summary = self.summarizer.summarize(record).await?;
        let entry = SummaryEntry::new(&record.drug_name, summary);
        if entry.incomplete {
            tracing::debug!(drug = %record.drug_name, "Summary may be incomplete");
        }
        Ok((entry, self.retrieved(record)))
    }

    /// Look up one or more comma-separated names.
    ///
    /// Names with no match are skipped; the lookup fails only if none match.
    pub async fn analyze_name(&self, query: &str) -> ServiceResult<Lookup> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Rejected(NO_NAME_PROVIDED.into()));
        }

        let mut lookup = Lookup::default();
        for name in query.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let Some(record) = self.first_hit(name) else {
                tracing::debug!(name, "No match");
                continue;
            };
            let (entry, retrieved) = self.describe(record).await?;
            lookup.summaries.push(entry);
            lookup.retrieved.push(retrieved);
        }

        if lookup.summaries.is_empty() {
            return Err(ServiceError::NotFound(NO_VALID_MEDICINE.into()));
        }
        tracing::info!(query, found = lookup.summaries.len(), "Name lookup");
        Ok(lookup)
    }

    /// OCR a base64 prescription image and look up every drug name found.
    pub async fn analyze_image(&self, payload: &str) -> ServiceResult<Lookup> {
        let image = decode_image_payload(payload)?;
        let lines = self.ocr.read_text(&image).await?;
        tracing::debug!(
            engine = self.ocr.name(),
            bytes = image.len(),
            lines = lines.len(),
            "OCR read"
        );

        let detected = self.strategy.extract(&lines);
        if detected.is_empty() {
            return Err(ServiceError::NotFound(NO_MEDICINES_DETECTED.into()));
        }

        let hits: Vec<&MedicineRecord> =
            detected.iter().filter_map(|n| self.first_hit(n)).collect();
        if hits.is_empty() {
            return Err(ServiceError::NotFound(NO_MATCHING_MEDICINES.into()));
        }

        let mut lookup = Lookup::default();
        for (i, record) in hits.into_iter().enumerate() {
            let (mut entry, retrieved) = self.describe(record).await?;
            // Summaries after the first are separated by a blank line
            if i > 0 {
                entry.summary.insert(0, '\n');
            }
            lookup.summaries.push(entry);
            lookup.retrieved.push(retrieved);
        }

        tracing::info!(detected = detected.len(), found = lookup.summaries.len(), "Image lookup");
        lookup.detected = Some(detected);
        Ok(lookup)
    }

    /// A new summary for `name` that differs from `previous`, when the model allows.
    pub async fn regenerate(&self, name: &str, previous: &str) -> ServiceResult<Lookup> {
        let record = self
            .first_hit(name.trim())
            .ok_or_else(|| ServiceError::Rejected(MEDICINE_NOT_FOUND.into()))?;

        let summary = self
            .summarizer
            .regenerate(record, previous, self.regenerate_attempts)
            .await?;

        Ok(Lookup {
            detected: None,
            summaries: vec![SummaryEntry::new(&record.drug_name, format!("\n{}", summary))],
            retrieved: vec![self.retrieved(record)],
        })
    }
}
