//! Medlookup Core Library
//!
//! Medicine dataset lookup with fuzzy drug-name search and prescription text extraction.
//!
//! # Architecture
//!
//! ```text
//! Typed name ─────────────────────────┐
//!                                     │
//! Prescription photo → OCR lines      │
//!          │                          │
//!   [extraction: TAB ... 1+0+1]       │
//!          │                          │
//!          └──────────► Search ◄──────┘
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼              ▼              ▼
//!     Raw record     Alternatives   Summary prompt
//!                  (same ingredient)  (medlookup-llm)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (MedicineRecord, ParsedMedicine)
//! - [`dataset`]: JSON dataset loading and key normalization
//! - [`search`]: Substring/token search with fuzzy fallback, alternatives
//! - [`extraction`]: Drug names from OCR text

pub mod dataset;
pub mod extraction;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use dataset::{normalize_string, Dataset, DatasetError, DatasetResult};
pub use extraction::{extract_meds, ExtractionStrategy, OcrText};
pub use models::{CanonicalField, MedicineRecord, ParsedMedicine, RawRecord};
pub use search::{alternatives_for, SearchOptions, Searcher};
