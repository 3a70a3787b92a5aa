//! Lifecycle notifications around every dispatched rule

use tracing::trace;

use crate::error::StrataError;
use crate::input::Position;

/// Lifecycle hooks invoked by the dispatcher for rules that are not hook-exempt
///
/// `start` fires before the raw match, then exactly one of `success`,
/// `failure` or `unwind`. `unwind` fires for every started rule a fatal error
/// propagates through. `raise` builds the error for a failed required match.
pub trait Control {
    fn start(&mut self, _rule: &str, _at: &Position) {}

    fn success(&mut self, _rule: &str, _at: &Position) {}

    fn failure(&mut self, _rule: &str, _at: &Position) {}

    fn unwind(&mut self, _rule: &str, _at: &Position) {}

    fn raise(&mut self, rule: &str, at: &Position) -> StrataError {
        StrataError::required_match(rule, at)
    }
}

/// Does nothing besides raising the default error
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalControl;

impl Control for NormalControl {}

/// Emits a TRACE event for every lifecycle notification
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingControl {
    depth: usize,
}

impl TracingControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules started but not yet finished
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Control for TracingControl {
    fn start(&mut self, rule: &str, at: &Position) {
        trace!(depth = self.depth, %at, "start {}", rule);
        self.depth += 1;
    }

    fn success(&mut self, rule: &str, at: &Position) {
        self.depth = self.depth.saturating_sub(1);
        trace!(depth = self.depth, %at, "success {}", rule);
    }

    fn failure(&mut self, rule: &str, at: &Position) {
        self.depth = self.depth.saturating_sub(1);
        trace!(depth = self.depth, %at, "failure {}", rule);
    }

    fn unwind(&mut self, rule: &str, at: &Position) {
        self.depth = self.depth.saturating_sub(1);
        trace!(depth = self.depth, %at, "unwind {}", rule);
    }

    fn raise(&mut self, rule: &str, at: &Position) -> StrataError {
        trace!(depth = self.depth, %at, "raise {}", rule);
        StrataError::required_match(rule, at)
    }
}
