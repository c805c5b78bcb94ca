//! Fatal analysis errors.
//!
//! Only input errors abort the pipeline; every other anomaly degrades to a
//! [`crate::warning::ParseWarning`] in the report. The caller-visible
//! failure mode is narrow: a complete report, or exactly one of these.

use thiserror::Error;

/// Fatal errors returned by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The input log text was empty (or whitespace only).
    #[error("input log text is empty")]
    EmptyInput,
}
