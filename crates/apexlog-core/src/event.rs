//! The decoded event model.
//!
//! [`Event`] is a closed tagged union over the event-type tags the decoder
//! recognizes, with `Unknown` as the escape variant for tags introduced by
//! future platform log versions. Keeping the union closed makes every
//! downstream match exhaustive and statically checkable while still
//! tolerating unseen tags.

use serde::{Deserialize, Serialize};

use crate::limits::LimitCategory;

/// Kind of code execution unit opening a scope in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeUnitKind {
    /// The outermost `EXECUTION_STARTED`/`EXECUTION_FINISHED` bracket.
    Execution,
    /// A trigger invocation (`CODE_UNIT_STARTED` with a trigger label).
    Trigger,
    /// A method body (`METHOD_ENTRY`/`METHOD_EXIT` or a plain class unit).
    Method,
    /// A workflow rule evaluation.
    Workflow,
    /// A flow interview.
    Flow,
    /// Anonymous Apex execution.
    Anonymous,
}

/// DML operation kind carried by `DML_BEGIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DmlOp {
    Insert,
    Update,
    Delete,
    Upsert,
    Undelete,
    Merge,
}

/// One decoded log event. All timestamps are elapsed nanoseconds since the
/// start of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A code unit opened a new execution scope.
    CodeUnitStarted {
        kind: CodeUnitKind,
        identifier: String,
        timestamp_ns: u64,
    },

    /// A code unit closed its execution scope.
    CodeUnitFinished {
        kind: CodeUnitKind,
        identifier: String,
        timestamp_ns: u64,
    },

    /// A SOQL query was issued.
    SoqlExecuteBegin { query: String, timestamp_ns: u64 },

    /// A SOQL query completed, reporting the rows returned.
    SoqlExecuteEnd { row_count: u64, timestamp_ns: u64 },

    /// A DML statement was issued.
    DmlBegin {
        op: DmlOp,
        object_type: String,
        row_count: u64,
        timestamp_ns: u64,
    },

    /// A DML statement completed.
    DmlEnd { timestamp_ns: u64 },

    /// A governor-limit snapshot: current consumption against the cap for
    /// one category at this point in the stream.
    LimitUsage {
        category: LimitCategory,
        used: u64,
        limit: u64,
        timestamp_ns: u64,
    },

    /// An exception was thrown (or a fatal error reported).
    Exception {
        error_type: String,
        message: String,
        timestamp_ns: u64,
    },

    /// An unrecognized event tag, fields preserved verbatim for forward
    /// compatibility.
    Unknown {
        tag: String,
        fields: Vec<String>,
        timestamp_ns: u64,
    },
}

impl Event {
    /// Elapsed-nanoseconds timestamp of this event.
    pub fn timestamp_ns(&self) -> u64 {
        match self {
            Event::CodeUnitStarted { timestamp_ns, .. }
            | Event::CodeUnitFinished { timestamp_ns, .. }
            | Event::SoqlExecuteBegin { timestamp_ns, .. }
            | Event::SoqlExecuteEnd { timestamp_ns, .. }
            | Event::DmlBegin { timestamp_ns, .. }
            | Event::DmlEnd { timestamp_ns }
            | Event::LimitUsage { timestamp_ns, .. }
            | Event::Exception { timestamp_ns, .. }
            | Event::Unknown { timestamp_ns, .. } => *timestamp_ns,
        }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Event::Exception { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_accessor_covers_all_variants() {
        let e = Event::SoqlExecuteBegin {
            query: "SELECT Id FROM Account".to_string(),
            timestamp_ns: 123,
        };
        assert_eq!(e.timestamp_ns(), 123);

        let e = Event::DmlEnd { timestamp_ns: 456 };
        assert_eq!(e.timestamp_ns(), 456);

        let e = Event::Unknown {
            tag: "HEAP_ALLOCATE".to_string(),
            fields: vec!["[5]".to_string(), "Bytes:12".to_string()],
            timestamp_ns: 789,
        };
        assert_eq!(e.timestamp_ns(), 789);
    }

    #[test]
    fn exception_classification() {
        let soql = Event::SoqlExecuteBegin {
            query: "SELECT Id FROM Contact".to_string(),
            timestamp_ns: 1,
        };
        assert!(!soql.is_exception());

        let fatal = Event::Exception {
            error_type: "FATAL_ERROR".to_string(),
            message: "System.LimitException".to_string(),
            timestamp_ns: 2,
        };
        assert!(fatal.is_exception());
    }

    #[test]
    fn serde_tagged_representation() {
        let e = Event::Exception {
            error_type: "System.NullPointerException".to_string(),
            message: "Attempt to de-reference a null object".to_string(),
            timestamp_ns: 42,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "exception");
        assert_eq!(json["error_type"], "System.NullPointerException");

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }
}
