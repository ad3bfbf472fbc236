//! Route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::response::{HealthResponse, LookupResponse};
use crate::service::{LookupService, ServiceError};

/// `{"name": "napa, seclo"}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NameRequest {
    pub name: String,
}

/// `{"image": "<base64 or data URL>"}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImageRequest {
    pub image: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegenerateRequest {
    pub name: String,
    pub previous_summary: String,
}

type HandlerResult = Result<Json<LookupResponse>, ServiceError>;

pub async fn health(State(service): State<Arc<LookupService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        records: service.dataset().len(),
        generator: service.summarizer().generator_name().to_string(),
        ocr: service.ocr().name().to_string(),
    })
}

pub async fn analyze_name(
    State(service): State<Arc<LookupService>>,
    Json(req): Json<NameRequest>,
) -> HandlerResult {
    let lookup = service.analyze_name(&req.name).await?;
    Ok(Json(lookup.into()))
}

pub async fn analyze_image(
    State(service): State<Arc<LookupService>>,
    Json(req): Json<ImageRequest>,
) -> HandlerResult {
    let lookup = service.analyze_image(&req.image).await?;
    Ok(Json(lookup.into()))
}

pub async fn regenerate(
    State(service): State<Arc<LookupService>>,
    Json(req): Json<RegenerateRequest>,
) -> HandlerResult {
    let lookup = service.regenerate(&req.name, &req.previous_summary).await?;
    Ok(Json(lookup.into()))
}
