//! The analysis report: the pipeline's sole output artifact.

use serde::{Deserialize, Serialize};

use crate::finding::Finding;
use crate::limits::LimitTallies;
use crate::node::ExecutionNode;

/// Complete result of analyzing one debug log. Ownership passes to the
/// caller; the engine retains no state between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Root of the reconstructed execution tree (spans the whole log).
    pub tree: ExecutionNode,
    /// Per-scope, per-category governor-limit tallies.
    pub limits: LimitTallies,
    /// Diagnostic findings, sorted by severity then first occurrence.
    pub findings: Vec<Finding>,
    /// Recoverable anomalies accumulated across all pipeline stages,
    /// rendered as human-readable strings in discovery order.
    pub parse_warnings: Vec<String>,
}
