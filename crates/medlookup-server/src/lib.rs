//! Medlookup Server
//!
//! JSON API over the medicine dataset: look up typed names or a prescription
//! photo, get model-written summaries, the matching records and alternatives.
//!
//! # Modules
//!
//! - [`config`]: YAML/env/CLI configuration and backend construction
//! - [`ocr`]: OCR engine trait, image payload decoding, Tesseract CLI
//! - [`service`]: The lookup pipeline behind every endpoint
//! - [`http`]: axum router, handlers and response bodies

pub mod config;
pub mod http;
pub mod ocr;
pub mod service;

use medlookup_core::Dataset;
use medlookup_llm::{GenerationResult, Summarizer};

pub use config::{Config, ConfigError, Overrides};
pub use ocr::{OcrEngine, OcrError};
pub use service::{Lookup, LookupService, ServiceError, SummaryEntry};

/// Wire a service from configuration and an already loaded dataset.
pub fn build_service(config: &Config, dataset: Dataset) -> GenerationResult<LookupService> {
    let generator = config.generation.build_generator()?;
    let summarizer = Summarizer::new(generator, config.generation.params())
        .with_require_facts(config.generation.require_facts);

    Ok(LookupService::new(dataset, summarizer, config.ocr.build_engine())
        .with_search_options(config.search.options())
        .with_max_alternatives(config.search.max_alternatives)
        .with_strategy(config.ocr.strategy)
        .with_regenerate_attempts(config.generation.max_regenerate_attempts))
}

