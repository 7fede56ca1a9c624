//! Request and response bodies.

use placenames_types::Suggestion;
use serde::{Deserialize, Serialize};

/// Query string of the prefix endpoint.
///
/// `max_results` is kept as text so an empty value can fall back to the
/// default and a non-integer value is reported with the same message as an
/// out-of-range one.
#[derive(Debug, Default, Deserialize)]
pub struct PrefixParams {
    pub max_results: Option<String>,
}

/// Body of a successful prefix lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrefixResponse {
    pub results: Vec<Suggestion>,
}

/// Body of `GET /healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
    pub nodes: usize,
}
