//! Diagnostic findings produced by the rule battery.
//!
//! A [`Finding`] captures enough context for a dashboard or agent to act on
//! it without re-reading the log: the rule, severity, triggering scope, a
//! human-readable message, and the evidence events behind it.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::id::ScopeId;

/// Severity of a finding. Reports order critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Sort rank: lower sorts first in reports.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

/// Identifies which rule produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SoqlInLoop,
    DmlInLoop,
    LimitThreshold,
    UncaughtException,
    UnterminatedScope,
}

/// One diagnostic finding. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: RuleId,
    pub severity: Severity,
    pub scope_id: ScopeId,
    pub message: String,
    /// First-occurrence timestamp, used for ordering within a severity.
    pub timestamp_ns: u64,
    /// Events substantiating the finding, in stream order.
    pub evidence: Vec<Event>,
}

/// Sorts findings by severity (critical > warning > info), ties broken by
/// ascending first-occurrence timestamp. The sort is stable, so emission
/// order decides any remaining ties.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|f| (f.severity.rank(), f.timestamp_ns));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(rule: RuleId, severity: Severity, ts: u64) -> Finding {
        Finding {
            rule,
            severity,
            scope_id: ScopeId(1),
            message: String::new(),
            timestamp_ns: ts,
            evidence: Vec::new(),
        }
    }

    #[test]
    fn critical_sorts_before_warning_before_info() {
        let mut findings = vec![
            finding(RuleId::UnterminatedScope, Severity::Info, 0),
            finding(RuleId::SoqlInLoop, Severity::Warning, 5),
            finding(RuleId::UncaughtException, Severity::Critical, 9),
        ];
        sort_findings(&mut findings);
        let severities: Vec<Severity> = findings.iter().map(|f| f.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::Warning, Severity::Info]
        );
    }

    #[test]
    fn ties_break_by_timestamp() {
        let mut findings = vec![
            finding(RuleId::DmlInLoop, Severity::Warning, 20),
            finding(RuleId::SoqlInLoop, Severity::Warning, 10),
        ];
        sort_findings(&mut findings);
        assert_eq!(findings[0].timestamp_ns, 10);
        assert_eq!(findings[1].timestamp_ns, 20);
    }

    #[test]
    fn rule_id_serializes_kebab_case() {
        let json = serde_json::to_string(&RuleId::SoqlInLoop).unwrap();
        assert_eq!(json, "\"soql-in-loop\"");
        let json = serde_json::to_string(&RuleId::UncaughtException).unwrap();
        assert_eq!(json, "\"uncaught-exception\"");
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_severity() -> impl Strategy<Value = Severity> {
            prop_oneof![
                Just(Severity::Info),
                Just(Severity::Warning),
                Just(Severity::Critical),
            ]
        }

        proptest! {
            #[test]
            fn sorted_findings_are_ordered_by_rank_then_timestamp(
                inputs in prop::collection::vec((arb_severity(), 0u64..1000), 0..32)
            ) {
                let mut findings: Vec<Finding> = inputs
                    .into_iter()
                    .map(|(severity, ts)| finding(RuleId::LimitThreshold, severity, ts))
                    .collect();
                sort_findings(&mut findings);
                for pair in findings.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    prop_assert!(a.severity.rank() <= b.severity.rank());
                    if a.severity == b.severity {
                        prop_assert!(a.timestamp_ns <= b.timestamp_ns);
                    }
                }
            }
        }
    }
}
