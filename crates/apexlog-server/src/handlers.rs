//! HTTP handlers for the log analysis API.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use apexlog_analyze::analyze;
use apexlog_core::{AnalysisReport, AnalyzeConfig};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw debug log text.
    pub log: String,
    /// Optional per-request analyzer configuration; fields not supplied
    /// fall back to their defaults, and omitting the whole object uses the
    /// server-wide configuration.
    #[serde(default)]
    pub config: Option<AnalyzeConfig>,
}

/// Response body for `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub report: AnalysisReport,
}

/// Runs the analysis pipeline over the submitted log text.
///
/// `POST /analyze`
pub async fn analyze_log(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let config = req.config.unwrap_or_else(|| state.config.clone());
    let report = analyze(&req.log, &config)?;
    tracing::debug!(
        findings = report.findings.len(),
        warnings = report.parse_warnings.len(),
        "analysis complete"
    );
    Ok(Json(AnalyzeResponse {
        success: true,
        report,
    }))
}

/// Liveness probe.
///
/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
