//! Server configuration.
//!
//! Resolution order: built-in defaults, then the YAML file, then `MEDLOOKUP_*`
//! environment variables, then command-line overrides.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use medlookup_core::search::DEFAULT_MAX_ALTERNATIVES;
use medlookup_core::{ExtractionStrategy, SearchOptions};
use medlookup_llm::{
    EchoGenerator, GenerationParams, GenerationResult, HuggingFaceGenerator, OllamaGenerator,
    SummaryGenerator, DEFAULT_REGENERATE_ATTEMPTS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::{DisabledOcr, OcrEngine, TesseractCli};

pub const ENV_PORT: &str = "MEDLOOKUP_PORT";
pub const ENV_DATASET: &str = "MEDLOOKUP_DATASET";
pub const ENV_OLLAMA_URL: &str = "MEDLOOKUP_OLLAMA_URL";
pub const ENV_MODEL: &str = "MEDLOOKUP_MODEL";
pub const ENV_API_TOKEN: &str = "MEDLOOKUP_API_TOKEN";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "medlookup=info,tower_http=info";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("medicine_data_cleaned.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub fuzzy_cutoff: f64,
    pub max_alternatives: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            max_results: options.max_results,
            fuzzy_cutoff: options.fuzzy_cutoff,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results,
            fuzzy_cutoff: self.fuzzy_cutoff,
        }
    }
}

/// Which model backend produces summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorBackend {
    /// Returns the prompt itself (no model server)
    #[default]
    Echo,
    Ollama,
    #[serde(alias = "hf")]
    HuggingFace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GeneratorBackend,
    pub base_url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub max_length: u32,
    pub num_beams: u32,
    pub repetition_penalty: f32,
    pub early_stopping: bool,
    pub max_regenerate_attempts: usize,
    /// Regenerated summaries must mention the indication and pregnancy use
    pub require_facts: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            backend: GeneratorBackend::default(),
            base_url: "http://localhost:11434".into(),
            model: "llama3.2:1b".into(),
            api_token: None,
            timeout_secs: 120,
            max_length: params.max_length,
            num_beams: params.num_beams,
            repetition_penalty: params.repetition_penalty,
            early_stopping: params.early_stopping,
            max_regenerate_attempts: DEFAULT_REGENERATE_ATTEMPTS,
            require_facts: false,
        }
    }
}

impl GenerationConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_length: self.max_length,
            num_beams: self.num_beams,
            repetition_penalty: self.repetition_penalty,
            early_stopping: self.early_stopping,
        }
    }

    /// Instantiate the configured backend.
    pub fn build_generator(&self) -> GenerationResult<Arc<dyn SummaryGenerator>> {
        let timeout = Duration::from_secs(self.timeout_secs);
        let generator: Arc<dyn SummaryGenerator> = match self.backend {
            GeneratorBackend::Echo => Arc::new(EchoGenerator),
            GeneratorBackend::Ollama => Arc::new(OllamaGenerator::with_timeout(
                &self.base_url,
                &self.model,
                timeout,
            )?),
            GeneratorBackend::HuggingFace => Arc::new(HuggingFaceGenerator::new(
                &self.base_url,
                &self.model,
                self.api_token.clone(),
                timeout,
            )?),
        };
        Ok(generator)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    #[default]
    Tesseract,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub backend: OcrBackend,
    pub binary: String,
    pub lang: String,
    pub strategy: ExtractionStrategy,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::default(),
            binary: "tesseract".into(),
            lang: "eng".into(),
            strategy: ExtractionStrategy::default(),
        }
    }
}

impl OcrConfig {
    pub fn build_engine(&self) -> Arc<dyn OcrEngine> {
        match self.backend {
            OcrBackend::Tesseract => Arc::new(TesseractCli::new(&self.binary, &self.lang)),
            OcrBackend::Disabled => Arc::new(DisabledOcr),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
    pub ocr: OcrConfig,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            search: SearchConfig::default(),
            generation: GenerationConfig::default(),
            ocr: OcrConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dataset: Option<PathBuf>,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Defaults, optional file, process environment and overrides, validated.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|var| std::env::var(var).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply `MEDLOOKUP_*` variables from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_PORT) {
            self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PORT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = get(ENV_DATASET) {
            self.dataset.path = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_OLLAMA_URL) {
            self.generation.base_url = value;
        }
        if let Some(value) = get(ENV_MODEL) {
            self.generation.model = value;
        }
        if let Some(value) = get(ENV_API_TOKEN) {
            self.generation.api_token = Some(value);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(dataset) = &overrides.dataset {
            self.dataset.path = dataset.clone();
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let cutoff = self.search.fuzzy_cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(ConfigError::Invalid(format!(
                "search.fuzzy_cutoff must be within [0, 1], got {}",
                cutoff
            )));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid("search.max_results must be at least 1".into()));
        }
        if self.generation.backend != GeneratorBackend::Echo
            && self.generation.base_url.trim().is_empty()
        {
            return Err(ConfigError::Invalid("generation.base_url is required".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
