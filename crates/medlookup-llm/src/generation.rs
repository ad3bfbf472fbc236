//! Text-generation interface and output cleanup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GenerationError::InvalidResponse(e.to_string())
        } else {
            GenerationError::Network(e.to_string())
        }
    }
}

/// Decoding parameters passed to the model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Maximum output length in tokens
    pub max_length: u32,
    /// Beam search width (backends without beam search ignore it)
    pub num_beams: u32,
    pub repetition_penalty: f32,
    /// Stop beam search once every beam has finished
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 250,
            num_beams: 4,
            repetition_penalty: 1.2,
            early_stopping: true,
        }
    }
}

/// A pretrained text-generation model.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Generate raw text for a prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> GenerationResult<String>;

    /// Short backend/model label for logs.
    fn name(&self) -> &str;
}

static INSTRUCTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(write|create|summarize|describe|provide|generate).*?:").unwrap()
});

/// Strip an echoed instruction ("Summarize the following: ..."), trim, end with one newline.
pub fn clean_summary(raw: &str) -> String {
    let stripped = INSTRUCTION_PREFIX.replace(raw.trim(), "");
    let mut summary = stripped.trim().to_string();
    summary.push('\n');
    summary
}

/// Offline backend that returns the prompt unchanged, for deployments without a model server.
#[derive(Debug, Default, Clone)]
pub struct EchoGenerator;

#[async_trait]
impl SummaryGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> GenerationResult<String> {
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Mock backend replaying canned outputs in order, cycling (for testing).
#[derive(Debug)]
pub struct ScriptedGenerator {
    outputs: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outputs: outputs.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> GenerationResult<String> {
        if self.outputs.is_empty() {
            return Err(GenerationError::Config("no scripted outputs".into()));
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(self.outputs[n % self.outputs.len()].clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_summary_strips_instruction() {
        assert_eq!(
            clean_summary("Summarize this medicine: Napa treats fever."),
            "Napa treats fever.\n"
        );
        assert_eq!(
            clean_summary("WRITE a short note: Seclo reduces acid."),
            "Seclo reduces acid.\n"
        );
        assert_eq!(clean_summary("  generate:  text  "), "text\n");
    }

    #[test]
    fn test_clean_summary_only_leading_instruction() {
        // Instruction words later in the text are kept
        assert_eq!(
            clean_summary("Napa is used for fever. Describe: symptoms."),
            "Napa is used for fever. Describe: symptoms.\n"
        );
        // Stops at the first colon
        assert_eq!(
            clean_summary("Provide details: Dosage: 500mg"),
            "Dosage: 500mg\n"
        );
    }

    #[test]
    fn test_clean_summary_plain_text() {
        assert_eq!(clean_summary("Napa treats fever."), "Napa treats fever.\n");
        assert_eq!(clean_summary(""), "\n");
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_length, 250);
        assert_eq!(params.num_beams, 4);
        assert!((params.repetition_penalty - 1.2).abs() < f32::EPSILON);
        assert!(params.early_stopping);
    }

    #[tokio::test]
    async fn test_echo_generator() {
        let out = EchoGenerator
            .generate("Napa is used for fever.", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(out, "Napa is used for fever.");
    }

    #[tokio::test]
    async fn test_scripted_generator_cycles() {
        let generator = ScriptedGenerator::new(["a", "b"]);
        let params = GenerationParams::default();

        assert_eq!(generator.generate("", &params).await.unwrap(), "a");
        assert_eq!(generator.generate("", &params).await.unwrap(), "b");
        assert_eq!(generator.generate("", &params).await.unwrap(), "a");
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_scripted_generator_empty() {
        let generator = ScriptedGenerator::new(Vec::<String>::new());
        let result = generator.generate("", &GenerationParams::default()).await;
        assert!(matches!(result, Err(GenerationError::Config(_))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_clean_summary_single_trailing_newline(raw in "\\PC{0,80}") {
                let summary = clean_summary(&raw);
                prop_assert!(summary.ends_with('\n'));
                let body = &summary[..summary.len() - 1];
                prop_assert_eq!(body, body.trim());
            }
        }
    }
}
