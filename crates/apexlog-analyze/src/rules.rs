//! The diagnostics rule battery.
//!
//! Each rule is a pure function over the shared [`RuleContext`]; rules see
//! neither each other's output nor any mutable shared state, so rules can be
//! added or removed independently. The fixed [`RULES`] table drives
//! [`run_rules`], which sorts the combined findings by severity and first
//! occurrence. Every rule produces at most one finding per triggering scope.

use indexmap::IndexMap;

use apexlog_core::finding::sort_findings;
use apexlog_core::{
    AnalyzeConfig, Event, ExecutionNode, Finding, LimitTallies, LimitTally, ParseWarning, RuleId,
    ScopeKind, Severity,
};

/// Evidence events attached to a loop finding are capped at this many.
const MAX_LOOP_EVIDENCE: usize = 5;

/// Shared, read-only inputs for every rule.
pub struct RuleContext<'a> {
    pub tree: &'a ExecutionNode,
    pub limits: &'a LimitTallies,
    pub warnings: &'a [ParseWarning],
    pub config: &'a AnalyzeConfig,
}

type RuleFn = fn(&RuleContext<'_>, &mut Vec<Finding>);

/// The fixed rule table, in emission order.
const RULES: [RuleFn; 5] = [
    soql_in_loop,
    dml_in_loop,
    limit_threshold,
    uncaught_exception,
    unterminated_scope,
];

/// Runs every rule and returns the sorted findings.
pub fn run_rules(ctx: &RuleContext<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in RULES {
        rule(ctx, &mut findings);
    }
    sort_findings(&mut findings);
    findings
}

/// SOQL issued from repeated sibling iterations of the same scope.
fn soql_in_loop(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    repeated_work_rule(
        ctx,
        out,
        RuleId::SoqlInLoop,
        "SOQL query",
        |e| matches!(e, Event::SoqlExecuteBegin { .. }),
    );
}

/// DML issued from repeated sibling iterations of the same scope.
fn dml_in_loop(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    repeated_work_rule(
        ctx,
        out,
        RuleId::DmlInLoop,
        "DML statement",
        |e| matches!(e, Event::DmlBegin { .. }),
    );
}

/// Shared loop-detection body for the soql-in-loop and dml-in-loop rules.
///
/// A "loop" is inferred structurally: two or more sibling child scopes of
/// identical kind and identifier under one parent, starting within the
/// configured detection window. If the subtrees of those iterations contain
/// two or more matching events in total, the parent gets one finding.
fn repeated_work_rule(
    ctx: &RuleContext<'_>,
    out: &mut Vec<Finding>,
    rule: RuleId,
    what: &str,
    is_hit: fn(&Event) -> bool,
) {
    for parent in ctx.tree.walk() {
        let mut groups: IndexMap<(ScopeKind, &str), Vec<&ExecutionNode>> = IndexMap::new();
        for child in &parent.children {
            groups
                .entry((child.kind, child.identifier.as_str()))
                .or_default()
                .push(child);
        }

        for ((_, identifier), members) in &groups {
            let members = within_window(members, ctx.config.loop_detection_window_ns);
            if members.len() < 2 {
                continue;
            }

            let mut evidence: Vec<Event> = Vec::new();
            for member in &members {
                for node in member.walk() {
                    evidence.extend(node.raw_events.iter().filter(|e| is_hit(e)).cloned());
                }
            }
            if evidence.len() < 2 {
                continue;
            }

            let count = evidence.len();
            let timestamp_ns = evidence
                .iter()
                .map(|e| e.timestamp_ns())
                .min()
                .unwrap_or(parent.start_ns);
            evidence.truncate(MAX_LOOP_EVIDENCE);
            out.push(Finding {
                rule,
                severity: Severity::Warning,
                scope_id: parent.id,
                message: format!(
                    "{} issued {} times across {} repeated iterations of '{}'",
                    what,
                    count,
                    members.len(),
                    identifier
                ),
                timestamp_ns,
                evidence,
            });
            break; // one finding per triggering scope
        }
    }
}

/// Keeps the group members whose start falls within `window` of the first.
fn within_window<'a>(
    members: &[&'a ExecutionNode],
    window: Option<u64>,
) -> Vec<&'a ExecutionNode> {
    match (window, members.first()) {
        (Some(window), Some(first)) => members
            .iter()
            .filter(|m| m.start_ns.saturating_sub(first.start_ns) <= window)
            .copied()
            .collect(),
        _ => members.to_vec(),
    }
}

/// Limit usage at or beyond the configured warning/critical ratios.
///
/// When several categories breach in one scope, the finding reports the one
/// with the worst severity, then the worst ratio.
fn limit_threshold(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    for (scope_id, per_category) in ctx.limits {
        let mut worst: Option<(Severity, f64, &LimitTally)> = None;
        for tally in per_category.values() {
            if tally.limit == 0 {
                continue;
            }
            let ratio = tally.peak_used as f64 / tally.limit as f64;
            let severity = if ratio >= ctx.config.critical_limit_ratio {
                Severity::Critical
            } else if ratio >= ctx.config.warning_limit_ratio {
                Severity::Warning
            } else {
                continue;
            };
            let replace = match worst {
                None => true,
                Some((s, r, _)) => severity.rank() < s.rank() || (severity == s && ratio > r),
            };
            if replace {
                worst = Some((severity, ratio, tally));
            }
        }

        if let Some((severity, ratio, tally)) = worst {
            out.push(Finding {
                rule: RuleId::LimitThreshold,
                severity,
                scope_id: *scope_id,
                message: format!(
                    "{} usage at {}/{} ({:.0}% of the governor limit)",
                    tally.category,
                    tally.peak_used,
                    tally.limit,
                    ratio * 100.0
                ),
                timestamp_ns: tally.peak_at_ns,
                evidence: Vec::new(),
            });
        }
    }
}

/// An exception with no recovery marker: either the last raw event of its
/// scope, or cascading straight into another exception.
fn uncaught_exception(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    for node in ctx.tree.walk() {
        for (i, event) in node.raw_events.iter().enumerate() {
            let (error_type, message) = match event {
                Event::Exception {
                    error_type,
                    message,
                    ..
                } => (error_type, message),
                _ => continue,
            };
            let recovered = node
                .raw_events
                .get(i + 1)
                .is_some_and(|next| !next.is_exception());
            if recovered {
                continue;
            }

            let context_start = i.saturating_sub(ctx.config.max_exception_context);
            out.push(Finding {
                rule: RuleId::UncaughtException,
                severity: Severity::Critical,
                scope_id: node.id,
                message: format!("uncaught {}: {}", error_type, message),
                timestamp_ns: event.timestamp_ns(),
                evidence: node.raw_events[context_start..=i].to_vec(),
            });
            break; // one finding per triggering scope
        }
    }
}

/// Surfaces the builder's unterminated-scope warnings as info findings.
fn unterminated_scope(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    for warning in ctx.warnings {
        if let ParseWarning::UnterminatedScope {
            scope_id,
            identifier: _,
            end_ns,
        } = warning
        {
            out.push(Finding {
                rule: RuleId::UnterminatedScope,
                severity: Severity::Info,
                scope_id: *scope_id,
                message: warning.to_string(),
                timestamp_ns: *end_ns,
                evidence: Vec::new(),
            });
        }
    }
}
