pub mod config;
pub mod error;
pub mod event;
pub mod finding;
pub mod id;
pub mod limits;
pub mod node;
pub mod report;
pub mod warning;

// Re-export commonly used types
pub use config::AnalyzeConfig;
pub use error::AnalyzeError;
pub use event::{CodeUnitKind, DmlOp, Event};
pub use finding::{Finding, RuleId, Severity};
pub use id::ScopeId;
pub use limits::{LimitCategory, LimitSnapshot, LimitTallies, LimitTally};
pub use node::{ExecutionNode, ScopeKind};
pub use report::AnalysisReport;
pub use warning::ParseWarning;
