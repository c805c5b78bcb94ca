//! Governor-limit categories, snapshots, and per-scope tallies.
//!
//! Categories mirror the platform's synchronous-transaction governor limits.
//! [`LimitCategory::default_limit`] supplies the fixed platform cap used when
//! no snapshot line in the log carries one.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::ScopeId;

/// A governor-limit category tracked by the accountant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitCategory {
    /// SOQL queries issued.
    #[serde(rename = "SOQL")]
    SoqlQueries,
    /// Rows returned by SOQL queries.
    #[serde(rename = "SOQL_ROWS")]
    SoqlRows,
    /// DML statements issued.
    #[serde(rename = "DML")]
    DmlStatements,
    /// Rows processed by DML statements.
    #[serde(rename = "DML_ROWS")]
    DmlRows,
    /// CPU time, in milliseconds.
    #[serde(rename = "CPU")]
    CpuTime,
    /// Heap size, in bytes.
    #[serde(rename = "HEAP")]
    HeapSize,
    /// HTTP callouts issued.
    #[serde(rename = "CALLOUTS")]
    Callouts,
}

impl LimitCategory {
    /// All categories in canonical report order.
    pub const ALL: [LimitCategory; 7] = [
        LimitCategory::SoqlQueries,
        LimitCategory::SoqlRows,
        LimitCategory::DmlStatements,
        LimitCategory::DmlRows,
        LimitCategory::CpuTime,
        LimitCategory::HeapSize,
        LimitCategory::Callouts,
    ];

    /// Parses the category tag used in `LIMIT_USAGE` lines.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SOQL" => Some(LimitCategory::SoqlQueries),
            "SOQL_ROWS" => Some(LimitCategory::SoqlRows),
            "DML" => Some(LimitCategory::DmlStatements),
            "DML_ROWS" => Some(LimitCategory::DmlRows),
            "CPU" => Some(LimitCategory::CpuTime),
            "HEAP" => Some(LimitCategory::HeapSize),
            "CALLOUTS" => Some(LimitCategory::Callouts),
            _ => None,
        }
    }

    /// The wire tag for this category.
    pub fn tag(&self) -> &'static str {
        match self {
            LimitCategory::SoqlQueries => "SOQL",
            LimitCategory::SoqlRows => "SOQL_ROWS",
            LimitCategory::DmlStatements => "DML",
            LimitCategory::DmlRows => "DML_ROWS",
            LimitCategory::CpuTime => "CPU",
            LimitCategory::HeapSize => "HEAP",
            LimitCategory::Callouts => "CALLOUTS",
        }
    }

    /// Fixed platform cap for a synchronous transaction, used when the log
    /// never reports one for this category.
    pub fn default_limit(&self) -> u64 {
        match self {
            LimitCategory::SoqlQueries => 100,
            LimitCategory::SoqlRows => 50_000,
            LimitCategory::DmlStatements => 150,
            LimitCategory::DmlRows => 10_000,
            LimitCategory::CpuTime => 10_000,
            LimitCategory::HeapSize => 6_000_000,
            LimitCategory::Callouts => 100,
        }
    }
}

impl fmt::Display for LimitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One point-in-time limit reading attributed to an execution scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSnapshot {
    pub category: LimitCategory,
    pub used: u64,
    pub limit: u64,
    pub scope_id: ScopeId,
}

/// Aggregated consumption for one `(scope, category)` pair: the peak and the
/// final `used` values observed across the scope's snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitTally {
    pub category: LimitCategory,
    pub peak_used: u64,
    pub final_used: u64,
    pub limit: u64,
    /// Timestamp at which the peak was recorded.
    pub peak_at_ns: u64,
}

/// Per-scope, per-category tallies. `IndexMap` keeps deterministic insertion
/// order so identical inputs serialize to identical bytes.
pub type LimitTallies = IndexMap<ScopeId, IndexMap<LimitCategory, LimitTally>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip_for_all_categories() {
        for cat in LimitCategory::ALL {
            assert_eq!(LimitCategory::from_tag(cat.tag()), Some(cat));
        }
        assert_eq!(LimitCategory::from_tag("FUTURE_CALLS"), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&LimitCategory::SoqlQueries).unwrap();
        assert_eq!(json, "\"SOQL\"");
        let back: LimitCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LimitCategory::SoqlQueries);
    }

    #[test]
    fn category_works_as_map_key() {
        let mut map: IndexMap<LimitCategory, u64> = IndexMap::new();
        map.insert(LimitCategory::CpuTime, 1200);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"CPU\":1200}");
    }

    #[test]
    fn default_limits_are_positive() {
        for cat in LimitCategory::ALL {
            assert!(cat.default_limit() > 0);
        }
    }
}
