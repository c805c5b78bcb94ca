//! Recoverable parse anomalies.
//!
//! Every anomaly short of a fatal input error is recorded as a
//! [`ParseWarning`] and accumulated into the report; parsing never aborts on
//! a single bad line. Line numbers are 0-based source line numbers.

use thiserror::Error;

use crate::id::ScopeId;

/// A non-fatal anomaly observed while tokenizing, decoding, or building the
/// execution tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// A non-empty line did not match the `timestamp|TAG|fields` shape.
    #[error("line {line}: malformed log line")]
    MalformedLine { line: usize },

    /// A token's timestamp decreased relative to its predecessor. Both
    /// tokens are kept in original order.
    #[error("line {line}: timestamp regressed from {prev_ns}ns to {timestamp_ns}ns")]
    TimestampRegression {
        line: usize,
        prev_ns: u64,
        timestamp_ns: u64,
    },

    /// A known tag arrived with too few fields; the token was downgraded to
    /// an `Unknown` event.
    #[error("line {line}: {tag} expects at least {expected} field(s), got {actual}")]
    FieldCountMismatch {
        line: usize,
        tag: String,
        expected: usize,
        actual: usize,
    },

    /// A `LIMIT_USAGE` line named a category the engine does not track.
    #[error("line {line}: unknown limit category '{category}'")]
    UnknownLimitCategory { line: usize, category: String },

    /// A scope-closing event did not match the open scope; the pop was
    /// accepted anyway.
    #[error("scope close mismatch at {timestamp_ns}ns: open '{open}', closed by '{close}'")]
    MismatchedClose {
        open: String,
        close: String,
        timestamp_ns: u64,
    },

    /// A scope was still open at end of stream and was force-closed at the
    /// last event's timestamp.
    #[error("unterminated scope '{identifier}' force-closed at {end_ns}ns")]
    UnterminatedScope {
        scope_id: ScopeId,
        identifier: String,
        end_ns: u64,
    },
}
