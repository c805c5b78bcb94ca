//! Execution tree reconstruction.
//!
//! [`TreeBuilder`] consumes the ordered event stream in a single forward
//! pass, maintaining an explicit stack of open scopes. No recursion: stack
//! depth in memory is O(nesting depth) and never tied to the call stack, so
//! pathological input nesting cannot overflow, and force-closing whatever is
//! still open at end of stream is a plain loop over the same stack.

use apexlog_core::{Event, ExecutionNode, ParseWarning, ScopeId, ScopeKind};

/// Identifier given to the synthetic root scope.
pub const ROOT_IDENTIFIER: &str = "(root)";

/// Stack-based builder for the execution tree.
///
/// Feed events in stream order via [`observe`](TreeBuilder::observe), then
/// call [`finish`](TreeBuilder::finish) to force-close open scopes and take
/// the tree.
pub struct TreeBuilder {
    /// Open scopes; index 0 is always the synthetic root.
    stack: Vec<ExecutionNode>,
    next_id: u32,
    warnings: Vec<ParseWarning>,
    /// Highest timestamp seen, used to close scopes at end of stream.
    /// The maximum, not the literal final event: a trailing regressed
    /// timestamp must not push a forced close before the scope's children.
    last_ns: u64,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let root = ExecutionNode {
            id: ScopeId(0),
            kind: ScopeKind::Root,
            identifier: ROOT_IDENTIFIER.to_string(),
            start_ns: 0,
            end_ns: 0,
            children: Vec::new(),
            raw_events: Vec::new(),
        };
        TreeBuilder {
            stack: vec![root],
            next_id: 1,
            warnings: Vec::new(),
            last_ns: 0,
        }
    }

    /// The scope currently open at the top of the stack.
    pub fn current_scope(&self) -> ScopeId {
        // Invariant: the root is never popped, so the stack is non-empty.
        self.stack.last().map(|n| n.id).unwrap_or(ScopeId(0))
    }

    /// Consumes one event. Lifecycle events push or pop the scope stack;
    /// everything else is appended to the open scope's raw events. Returns
    /// the scope the event was attributed to.
    pub fn observe(&mut self, event: Event) -> ScopeId {
        let ts = event.timestamp_ns();
        if ts > self.last_ns {
            self.last_ns = ts;
        }

        match event {
            Event::CodeUnitStarted {
                kind,
                identifier,
                timestamp_ns,
            } => {
                let id = ScopeId(self.next_id);
                self.next_id += 1;
                self.stack.push(ExecutionNode {
                    id,
                    kind: kind.into(),
                    identifier,
                    start_ns: timestamp_ns,
                    end_ns: timestamp_ns,
                    children: Vec::new(),
                    raw_events: Vec::new(),
                });
                id
            }

            Event::CodeUnitFinished {
                kind,
                identifier,
                timestamp_ns,
            } => {
                if self.stack.len() == 1 {
                    // A close with nothing open: recoverable nesting fault.
                    self.warnings.push(ParseWarning::MismatchedClose {
                        open: ROOT_IDENTIFIER.to_string(),
                        close: identifier,
                        timestamp_ns,
                    });
                    return ScopeId(0);
                }

                let mut node = self.stack.pop().expect("stack has an open scope");
                if node.kind != ScopeKind::from(kind) || node.identifier != identifier {
                    // Best-effort recovery: warn, accept the pop anyway.
                    self.warnings.push(ParseWarning::MismatchedClose {
                        open: node.identifier.clone(),
                        close: identifier,
                        timestamp_ns,
                    });
                }
                node.end_ns = timestamp_ns;
                let id = node.id;
                self.attach(node);
                id
            }

            other => {
                let top = self.stack.last_mut().expect("stack has an open scope");
                top.raw_events.push(other);
                top.id
            }
        }
    }

    /// Force-closes any scopes still open at the last event's timestamp,
    /// closes the root, and returns the tree plus accumulated warnings.
    pub fn finish(mut self) -> (ExecutionNode, Vec<ParseWarning>) {
        while self.stack.len() > 1 {
            let mut node = self.stack.pop().expect("stack has an open scope");
            node.end_ns = self.last_ns;
            self.warnings.push(ParseWarning::UnterminatedScope {
                scope_id: node.id,
                identifier: node.identifier.clone(),
                end_ns: self.last_ns,
            });
            self.attach(node);
        }

        let mut root = self.stack.pop().expect("root scope");
        root.end_ns = self.last_ns;
        (root, self.warnings)
    }

    fn attach(&mut self, node: ExecutionNode) {
        let parent = self.stack.last_mut().expect("parent scope on stack");
        parent.children.push(node);
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
