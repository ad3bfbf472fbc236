//! JSON response bodies.
//!
//! Every body carries `ok`. Lookups that simply find nothing are still HTTP 200,
//! with `error` for unusable input and `message` for no match.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::service::{Lookup, ServiceError};

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub lookup: Lookup,
}

impl From<Lookup> for LookupResponse {
    fn from(lookup: Lookup) -> Self {
        Self { ok: true, lookup }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub generator: String,
    pub ocr: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::Rejected(msg) => (StatusCode::OK, json!({ "ok": false, "error": msg })),
            ServiceError::NotFound(msg) => (StatusCode::OK, json!({ "ok": false, "message": msg })),
            ServiceError::BadImage(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": self.to_string() }),
            ),
            ServiceError::Ocr(_) | ServiceError::Generation(_) => {
                tracing::warn!(error = %self, "Backend failure");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "ok": false, "error": self.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
