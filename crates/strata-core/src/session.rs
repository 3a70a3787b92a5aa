//! Parse sessions
//!
//! A [`Session`] is the concrete [`Matcher`]: it binds one cursor, the
//! caller's hook state, a compiled [`ActionTable`], a [`Control`] and the
//! matching limits for the duration of one or more parses.

use tracing::debug;

use crate::config::MatchingConfig;
use crate::error::StrataError;
use crate::hooks::{ActionTable, ApplyMode, Control, Matched, NormalControl};
use crate::input::{Cursor, EolKind, EolMatch, EolPolicy, Position};
use crate::result::Result;
use crate::rule::{Matcher, Rule, dispatch_rule};

/// Default limit on nested rule activations
pub const DEFAULT_MAX_DEPTH: usize = 1024;

pub struct Session<'a, S, C = NormalControl> {
    cursor: &'a mut dyn Cursor,
    actions: &'a ActionTable<S>,
    state: &'a mut S,
    control: C,
    eol: &'a dyn EolPolicy,
    mode: ApplyMode,
    depth: usize,
    max_depth: usize,
}

impl<'a, S> Session<'a, S> {
    pub fn new(cursor: &'a mut dyn Cursor, actions: &'a ActionTable<S>, state: &'a mut S) -> Self {
        Self {
            cursor,
            actions,
            state,
            control: NormalControl,
            eol: EolKind::default().policy(),
            mode: actions.mode(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl<'a, S, C: Control> Session<'a, S, C> {
    /// Replace the lifecycle control
    pub fn with_control<D: Control>(self, control: D) -> Session<'a, S, D> {
        Session {
            cursor: self.cursor,
            actions: self.actions,
            state: self.state,
            control,
            eol: self.eol,
            mode: self.mode,
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }

    pub fn with_eol(mut self, eol: &'a dyn EolPolicy) -> Self {
        self.eol = eol;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Apply the matching section of a loaded configuration
    pub fn with_options(self, options: &MatchingConfig) -> Self {
        self.with_eol(options.eol.policy())
            .with_max_depth(options.max_depth)
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn into_control(self) -> C {
        self.control
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Match `rule` at the current position
    pub fn parse<R: Rule + ?Sized>(&mut self, rule: &R) -> Result<bool> {
        debug!("Parsing '{}' at {}", rule.name(), self.cursor.position());
        let matched = dispatch_rule(self, rule)?;
        debug!(
            "Rule '{}' {} at {}",
            rule.name(),
            if matched { "matched" } else { "did not match" },
            self.cursor.position()
        );
        Ok(matched)
    }

    /// Match `rule` and require that it consumes the rest of the input
    ///
    /// Trailing input is an ordinary mismatch; the cursor is restored.
    pub fn parse_all<R: Rule + ?Sized>(&mut self, rule: &R) -> Result<bool> {
        let start = self.cursor.position();
        if self.parse(rule)? && self.cursor.is_empty() {
            return Ok(true);
        }
        self.cursor.rewind(start);
        Ok(false)
    }
}

impl<S, C: Control> Matcher for Session<'_, S, C> {
    fn cursor(&mut self) -> &mut dyn Cursor {
        &mut *self.cursor
    }

    fn match_eol(&mut self) -> EolMatch {
        self.eol.match_eol(&mut *self.cursor)
    }

    fn apply_mode(&self) -> ApplyMode {
        self.mode
    }

    fn set_apply_mode(&mut self, mode: ApplyMode) {
        self.mode = mode;
    }

    fn enter(&mut self, rule: &str) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(StrataError::depth_limit_exceeded(rule, self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn start(&mut self, rule: &str) {
        let at = self.cursor.position();
        self.control.start(rule, &at);
    }

    fn success(&mut self, rule: &str) {
        let at = self.cursor.position();
        self.control.success(rule, &at);
    }

    fn failure(&mut self, rule: &str) {
        let at = self.cursor.position();
        self.control.failure(rule, &at);
    }

    fn unwind(&mut self, rule: &str) {
        let at = self.cursor.position();
        self.control.unwind(rule, &at);
    }

    fn raise(&mut self, rule: &str) -> StrataError {
        let at = self.cursor.position();
        self.control.raise(rule, &at)
    }

    fn apply(&mut self, rule: &str, start: &Position) -> bool {
        if self.mode == ApplyMode::Nothing {
            return true;
        }
        let Some(hook) = self.actions.get(rule) else {
            return true;
        };
        let matched = Matched {
            text: self.cursor.text_since(start),
            start: *start,
        };
        hook.invoke(&matched, self.state)
    }
}
