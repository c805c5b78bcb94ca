//! Stable scope identifier for execution tree nodes.
//!
//! A `ScopeId` is a newtype over `u32` assigned in preorder creation order
//! during tree construction; the synthetic root scope is always `ScopeId(0)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one execution scope within a single analyzed log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
