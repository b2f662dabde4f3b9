//! Axum HTTP surface for the roast workflow, with body limits, timeouts and CORS.

mod handlers;
mod server;

pub use server::{build_app, is_public_bind, run_gateway, run_gateway_with_listener};

use crate::gating::RoastWorkflow;
use std::sync::Arc;

/// Largest accepted request body. Leaves room for multipart framing around a
/// maximum-size upload so the size check itself answers with a JSON 400.
pub const MAX_BODY_SIZE: usize = 6 * 1024 * 1024;
/// Covers screenshot capture plus two model calls.
pub const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<RoastWorkflow>,
}

/// `POST /api/analyze-url` body
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct AnalyzeUrlBody {
    #[serde(default)]
    pub url: Option<String>,
}

/// `POST /api/capture-email` body
#[derive(Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureEmailBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roast_id: Option<String>,
}
