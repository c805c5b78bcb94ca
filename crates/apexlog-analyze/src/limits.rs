//! Governor-limit accounting.
//!
//! [`LimitAccountant`] shares the tree builder's forward pass: each event is
//! attributed to the scope open at that point in the stream. For explicit
//! `LIMIT_USAGE` snapshots it records the peak and final `used` per
//! `(scope, category)`. SOQL query count and DML statement count are derived
//! analytically from `SOQL_EXECUTE_BEGIN`/`DML_BEGIN` events and are
//! authoritative even when snapshot lines are absent or stale.

use indexmap::IndexMap;

use apexlog_core::{Event, LimitCategory, LimitSnapshot, LimitTallies, LimitTally, ScopeId};

#[derive(Debug, Clone, Copy)]
struct TallyAcc {
    peak_used: u64,
    peak_at_ns: u64,
    final_used: u64,
    /// Cap reported by the most recent snapshot, if any.
    limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct CountAcc {
    count: u64,
    last_ns: u64,
}

/// Accumulates limit consumption per execution scope.
pub struct LimitAccountant {
    snapshots: IndexMap<(ScopeId, LimitCategory), TallyAcc>,
    soql_counts: IndexMap<ScopeId, CountAcc>,
    dml_counts: IndexMap<ScopeId, CountAcc>,
}

impl LimitAccountant {
    pub fn new() -> Self {
        LimitAccountant {
            snapshots: IndexMap::new(),
            soql_counts: IndexMap::new(),
            dml_counts: IndexMap::new(),
        }
    }

    /// Records one event against the scope open when it arrived. Lifecycle
    /// and non-limit events are ignored.
    pub fn observe(&mut self, scope: ScopeId, event: &Event) {
        match event {
            Event::LimitUsage {
                category,
                used,
                limit,
                timestamp_ns,
            } => {
                self.record(
                    LimitSnapshot {
                        category: *category,
                        used: *used,
                        limit: *limit,
                        scope_id: scope,
                    },
                    *timestamp_ns,
                );
            }

            Event::SoqlExecuteBegin { timestamp_ns, .. } => {
                let acc = self.soql_counts.entry(scope).or_default();
                acc.count += 1;
                acc.last_ns = *timestamp_ns;
            }

            Event::DmlBegin { timestamp_ns, .. } => {
                let acc = self.dml_counts.entry(scope).or_default();
                acc.count += 1;
                acc.last_ns = *timestamp_ns;
            }

            _ => {}
        }
    }

    /// Folds one explicit snapshot into the running tally for its scope:
    /// the peak `used` (and when it occurred), the final `used`, and the
    /// most recently reported cap.
    pub fn record(&mut self, snapshot: LimitSnapshot, timestamp_ns: u64) {
        let acc = self
            .snapshots
            .entry((snapshot.scope_id, snapshot.category))
            .or_insert(TallyAcc {
                peak_used: 0,
                peak_at_ns: timestamp_ns,
                final_used: 0,
                limit: None,
            });
        if snapshot.used > acc.peak_used {
            acc.peak_used = snapshot.used;
            acc.peak_at_ns = timestamp_ns;
        }
        acc.final_used = snapshot.used;
        acc.limit = Some(snapshot.limit);
    }

    /// Finalizes the tallies: derived counts overwrite snapshot values for
    /// their categories, and the result is ordered by scope id then by the
    /// canonical category order, so identical inputs produce identical
    /// serialized output.
    pub fn finish(mut self) -> LimitTallies {
        // Derived counts are authoritative for their categories. A snapshot
        // may still contribute its reported cap.
        let soql = std::mem::take(&mut self.soql_counts);
        for (scope, acc) in soql {
            self.override_with_count(scope, LimitCategory::SoqlQueries, acc);
        }
        let dml = std::mem::take(&mut self.dml_counts);
        for (scope, acc) in dml {
            self.override_with_count(scope, LimitCategory::DmlStatements, acc);
        }

        let mut scopes: Vec<ScopeId> = self.snapshots.keys().map(|(s, _)| *s).collect();
        scopes.sort_unstable();
        scopes.dedup();

        let mut tallies: LimitTallies = IndexMap::new();
        for scope in scopes {
            let mut per_category = IndexMap::new();
            for category in LimitCategory::ALL {
                if let Some(acc) = self.snapshots.get(&(scope, category)) {
                    per_category.insert(
                        category,
                        LimitTally {
                            category,
                            peak_used: acc.peak_used,
                            final_used: acc.final_used,
                            limit: acc.limit.unwrap_or_else(|| category.default_limit()),
                            peak_at_ns: acc.peak_at_ns,
                        },
                    );
                }
            }
            tallies.insert(scope, per_category);
        }
        tallies
    }

    fn override_with_count(&mut self, scope: ScopeId, category: LimitCategory, acc: CountAcc) {
        let entry = self
            .snapshots
            .entry((scope, category))
            .or_insert(TallyAcc {
                peak_used: 0,
                peak_at_ns: acc.last_ns,
                final_used: 0,
                limit: None,
            });
        entry.peak_used = acc.count;
        entry.final_used = acc.count;
        entry.peak_at_ns = acc.last_ns;
    }
}

impl Default for LimitAccountant {
    fn default() -> Self {
        Self::new()
    }
}
