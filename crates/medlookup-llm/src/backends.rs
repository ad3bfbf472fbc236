//! HTTP model backends.
//!
//! - [`OllamaGenerator`]: Ollama `/api/generate`
//! - [`HuggingFaceGenerator`]: HuggingFace-style inference endpoint (`/models/{model}`),
//!   which serves BART/T5 text2text models with beam search

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::generation::{GenerationError, GenerationParams, GenerationResult, SummaryGenerator};

/// Default timeout for generation requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

fn build_client(timeout: Duration) -> GenerationResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GenerationError::Config(e.to_string()))
}

async fn check_status(resp: reqwest::Response) -> GenerationResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GenerationError::Api {
        status: status.as_u16(),
        body,
    })
}

// =========================================================================
// Ollama
// =========================================================================

/// Request body for Ollama generate endpoint
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Options for Ollama generation
#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    repeat_penalty: f32,
}

/// Response from Ollama generate endpoint
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Generator backed by an Ollama server.
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> GenerationResult<Self> {
        Self::with_timeout(base_url, model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> GenerationResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GenerationError::Config("Ollama base URL is empty".into()));
        }
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SummaryGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> GenerationResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Ollama generate");

        let resp = self
            .client
            .post(&url)
            .json(&OllamaGenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: OllamaOptions {
                    num_predict: params.max_length,
                    repeat_penalty: params.repetition_penalty,
                },
            })
            .send()
            .await?;

        let result: OllamaGenerateResponse = check_status(resp).await?.json().await?;
        Ok(result.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

// =========================================================================
// HuggingFace inference
// =========================================================================

#[derive(Debug, Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_length: u32,
    num_beams: u32,
    repetition_penalty: f32,
    early_stopping: bool,
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct HfOutput {
    #[serde(alias = "summary_text", alias = "translation_text")]
    generated_text: String,
}

/// Generator backed by a HuggingFace-style inference endpoint.
pub struct HuggingFaceGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> GenerationResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(GenerationError::Config("inference base URL is empty".into()));
        }
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            model: model.into(),
            api_token: api_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SummaryGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> GenerationResult<String> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Inference generate");

        let mut request = self.client.post(&url).json(&HfRequest {
            inputs: prompt,
            parameters: HfParameters {
                max_length: params.max_length,
                num_beams: params.num_beams,
                repetition_penalty: params.repetition_penalty,
                early_stopping: params.early_stopping,
            },
            options: HfOptions {
                wait_for_model: true,
            },
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let outputs: Vec<HfOutput> = check_status(request.send().await?).await?.json().await?;
        outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| GenerationError::InvalidResponse("empty output list".into()))
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
