//! Property tests for the analysis pipeline.
//!
//! Generates random well-formed scope trees, renders them to log text, and
//! checks the structural invariants: every opened unit has exactly one tree
//! node, tree depth equals the maximum concurrent open-scope count, child
//! time ranges nest within their parents, and analysis is deterministic.

use proptest::prelude::*;

use apexlog_analyze::analyze;
use apexlog_core::{AnalyzeConfig, ExecutionNode};

#[derive(Debug, Clone)]
struct Unit {
    children: Vec<Unit>,
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    let leaf = Just(Unit {
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|children| Unit { children })
    })
}

fn unit_count(unit: &Unit) -> usize {
    1 + unit.children.iter().map(unit_count).sum::<usize>()
}

fn unit_depth(unit: &Unit) -> usize {
    1 + unit.children.iter().map(unit_depth).max().unwrap_or(0)
}

/// Renders a unit tree to log text: one METHOD_ENTRY/METHOD_EXIT pair per
/// unit, timestamps strictly increasing in stream order.
fn render(unit: &Unit) -> String {
    let mut out = String::from("64.0 APEX_CODE,FINEST\n");
    let mut ts = 0u64;
    let mut next_id = 0u32;
    render_unit(unit, &mut out, &mut ts, &mut next_id);
    out
}

fn render_unit(unit: &Unit, out: &mut String, ts: &mut u64, next_id: &mut u32) {
    let id = *next_id;
    *next_id += 1;
    *ts += 100;
    out.push_str(&format!(
        "09:00:00.0 ({})|METHOD_ENTRY|[1]|01p{}|Gen.m{}()\n",
        ts, id, id
    ));
    for child in &unit.children {
        render_unit(child, out, ts, next_id);
    }
    *ts += 100;
    out.push_str(&format!(
        "09:00:00.0 ({})|METHOD_EXIT|[1]|01p{}|Gen.m{}()\n",
        ts, id, id
    ));
}

/// Checks that every child's time range is contained in its parent's.
fn ranges_nest(node: &ExecutionNode) -> bool {
    let mut stack = vec![node];
    while let Some(parent) = stack.pop() {
        for child in &parent.children {
            if child.start_ns < parent.start_ns || child.end_ns > parent.end_ns {
                return false;
            }
            stack.push(child);
        }
    }
    true
}

proptest! {
    #[test]
    fn every_opened_unit_gets_exactly_one_node(unit in unit_strategy()) {
        let report = analyze(&render(&unit), &AnalyzeConfig::default()).unwrap();
        prop_assert!(report.parse_warnings.is_empty());
        // +1 for the synthetic root.
        prop_assert_eq!(report.tree.node_count(), unit_count(&unit) + 1);
    }

    #[test]
    fn tree_depth_equals_max_open_scopes(unit in unit_strategy()) {
        let report = analyze(&render(&unit), &AnalyzeConfig::default()).unwrap();
        prop_assert_eq!(report.tree.depth(), unit_depth(&unit));
    }

    #[test]
    fn child_ranges_nest_within_parents(unit in unit_strategy()) {
        let report = analyze(&render(&unit), &AnalyzeConfig::default()).unwrap();
        prop_assert!(ranges_nest(&report.tree));
    }

    #[test]
    fn analysis_is_deterministic(unit in unit_strategy()) {
        let text = render(&unit);
        let config = AnalyzeConfig::default();
        let a = serde_json::to_vec(&analyze(&text, &config).unwrap()).unwrap();
        let b = serde_json::to_vec(&analyze(&text, &config).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }
}
