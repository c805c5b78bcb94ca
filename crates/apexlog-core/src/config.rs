//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// Tunable thresholds for the analysis pipeline. All fields have defaults,
/// so callers may supply a partial (or empty) configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    /// Limit usage ratio at or above which a `warning` finding is produced.
    pub warning_limit_ratio: f64,
    /// Limit usage ratio at or above which a `critical` finding is produced.
    pub critical_limit_ratio: f64,
    /// Sibling iterations must start within this window (nanoseconds) to
    /// count as a loop. `None` means the whole log.
    pub loop_detection_window_ns: Option<u64>,
    /// Maximum number of context events attached as evidence to an
    /// uncaught-exception finding, in addition to the exception itself.
    pub max_exception_context: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        AnalyzeConfig {
            warning_limit_ratio: 0.8,
            critical_limit_ratio: 1.0,
            loop_detection_window_ns: None,
            max_exception_context: 5,
        }
    }
}
