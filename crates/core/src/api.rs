//! JSON bodies returned by the HTTP API.

use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

/// Rejected submission body (`422`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsResponse {
    /// Messages per failing field.
    pub errors: FieldErrors,
}

/// Store failure or malformed body (`503` / `400`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableResponse {
    /// Human-readable cause.
    pub error: String,
}

/// Validate-only response. Nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// True when `errors` is empty.
    pub ok: bool,
    /// Messages per failing field.
    pub errors: FieldErrors,
}
