//! The reconstructed execution tree.
//!
//! [`ExecutionNode`] is an owned tree: each node is owned exclusively by its
//! parent, and the root (kind [`ScopeKind::Root`]) represents the whole log.
//! The tree is built once by the tree builder and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::event::{CodeUnitKind, Event};
use crate::id::ScopeId;

/// Kind of execution scope. Mirrors [`CodeUnitKind`] plus the synthetic root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// The synthetic root scope spanning the whole log.
    Root,
    Execution,
    Trigger,
    Method,
    Workflow,
    Flow,
    Anonymous,
}

impl From<CodeUnitKind> for ScopeKind {
    fn from(kind: CodeUnitKind) -> Self {
        match kind {
            CodeUnitKind::Execution => ScopeKind::Execution,
            CodeUnitKind::Trigger => ScopeKind::Trigger,
            CodeUnitKind::Method => ScopeKind::Method,
            CodeUnitKind::Workflow => ScopeKind::Workflow,
            CodeUnitKind::Flow => ScopeKind::Flow,
            CodeUnitKind::Anonymous => ScopeKind::Anonymous,
        }
    }
}

/// One node in the reconstructed call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionNode {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub identifier: String,
    pub start_ns: u64,
    pub end_ns: u64,
    /// Child scopes in stream order.
    pub children: Vec<ExecutionNode>,
    /// Non-lifecycle events attributed to this scope, in stream order.
    pub raw_events: Vec<Event>,
}

impl ExecutionNode {
    /// Preorder traversal over this node and all descendants.
    ///
    /// Uses an explicit stack: traversal cost is O(nodes) with O(depth)
    /// auxiliary space regardless of input nesting depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Maximum nesting depth below this node (0 for a leaf).
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(&ExecutionNode, usize)> = vec![(self, 0)];
        while let Some((node, d)) = stack.pop() {
            if d > max {
                max = d;
            }
            for child in &node.children {
                stack.push((child, d + 1));
            }
        }
        max
    }
}

/// Preorder iterator over an execution tree. See [`ExecutionNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a ExecutionNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ExecutionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the leftmost child is visited first.
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
