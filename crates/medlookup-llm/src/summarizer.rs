//! Record → summary pipeline, with the "give me a different one" retry loop.

use std::sync::{Arc, Mutex, PoisonError};

use medlookup_core::MedicineRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::generation::{clean_summary, GenerationParams, GenerationResult, SummaryGenerator};
use crate::prompts::build_prompt;

/// Default number of tries when asking for a different summary.
pub const DEFAULT_REGENERATE_ATTEMPTS: usize = 5;

/// Summaries with fewer words than this are flagged as possibly incomplete.
pub const INCOMPLETE_WORD_THRESHOLD: usize = 30;

/// Whether a summary is short enough to be flagged as possibly incomplete.
pub fn is_incomplete(summary: &str) -> bool {
    summary.split_whitespace().count() < INCOMPLETE_WORD_THRESHOLD
}

fn mentions_facts(summary: &str) -> bool {
    let lower = summary.to_lowercase();
    lower.contains("indication") && lower.contains("pregnancy")
}

/// Append the indication and pregnancy sentences a summary does not mention.
fn complete_facts(record: &MedicineRecord, summary: &str) -> String {
    let mut out = summary.trim().to_string();
    let lower = out.to_lowercase();
    if !lower.contains("indication") {
        out.push_str(&format!(" This drug is indicated for {}.", record.indication.trim()));
    }
    if !lower.contains("pregnancy") {
        out.push_str(&format!(" Use during pregnancy: {}.", record.use_in_pregnancy.trim()));
    }
    out.push('\n');
    out
}

/// Builds prompts, calls the generator and cleans its output.
pub struct Summarizer {
    generator: Arc<dyn SummaryGenerator>,
    params: GenerationParams,
    rng: Mutex<StdRng>,
    require_facts: bool,
}

impl Summarizer {
    /// Create a summarizer with an entropy-seeded prompt picker.
    pub fn new(generator: Arc<dyn SummaryGenerator>, params: GenerationParams) -> Self {
        Self {
            generator,
            params,
            rng: Mutex::new(StdRng::from_entropy()),
            require_facts: false,
        }
    }

    /// Create a summarizer with a fixed seed (deterministic prompt choice).
    pub fn with_seed(generator: Arc<dyn SummaryGenerator>, params: GenerationParams, seed: u64) -> Self {
        Self {
            generator,
            params,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            require_facts: false,
        }
    }

    /// Make regenerated summaries mention the indication and pregnancy use.
    pub fn with_require_facts(mut self, require_facts: bool) -> Self {
        self.require_facts = require_facts;
        self
    }

    pub fn require_facts(&self) -> bool {
        self.require_facts
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    fn next_prompt(&self, record: &MedicineRecord) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        build_prompt(record, &mut *rng)
    }

    /// Generate a cleaned summary for a record.
    pub async fn summarize(&self, record: &MedicineRecord) -> GenerationResult<String> {
        let prompt = self.next_prompt(record);
        let raw = self.generator.generate(&prompt, &self.params).await?;
        Ok(clean_summary(&raw))
    }

    /// Generate a summary that differs from `previous` (compared trimmed).
    ///
    /// Tries at most `max_attempts` times (at least once). When every attempt
    /// reproduces `previous`, the last attempt is returned anyway.
    ///
    /// With `require_facts` a candidate must also mention "indication" and
    /// "pregnancy". If no attempt qualifies, the missing facts are appended to
    /// the last attempt from the record.
    pub async fn regenerate(
        &self,
        record: &MedicineRecord,
        previous: &str,
        max_attempts: usize,
    ) -> GenerationResult<String> {
        let previous = previous.trim();
        let attempts = max_attempts.max(1);
        let mut candidate = String::new();

        for attempt in 1..=attempts {
            candidate = self.summarize(record).await?;
            if candidate.trim() != previous && (!self.require_facts || mentions_facts(&candidate)) {
                tracing::debug!(drug = %record.drug_name, attempt, "Regenerated distinct summary");
                return Ok(candidate);
            }
        }

        tracing::debug!(
            drug = %record.drug_name,
            attempts,
            require_facts = self.require_facts,
            "No acceptable summary; returning last attempt"
        );
        if self.require_facts {
            return Ok(complete_facts(record, &candidate));
        }
        Ok(candidate)
    }
}
