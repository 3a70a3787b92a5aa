//! Long bracket literals
//!
//! Lua-style raw strings, with configurable delimiter characters:
//!
//! - an opening long bracket of level n is `open`, n `marker`s, `open`
//!   (`[[`, `[=[`, `[==[`, ...);
//! - a closing long bracket of level n is `close`, n `marker`s, `close`;
//! - the literal runs to the first closing bracket of the same level and may
//!   contain brackets of any other level;
//! - a line break directly after the opener is consumed but is not part of
//!   the content.
//!
//! Matching is split into an opener that records the delimiter width, a
//! content loop that stops in front of (without consuming) a closer of that
//! width, and a final commit that consumes the closer. Content that runs out
//! before a closer appears is a fatal [`StrataError::RequiredMatch`].
//!
//! [`StrataError::RequiredMatch`]: crate::StrataError::RequiredMatch

use crate::config::RawStringConfig;
use crate::input::Cursor;
use crate::result::Result;
use crate::rule::{BoxedRule, Matcher, Rule, RuleInfo, RuleShape, dispatch, dispatch_rule};

/// Delimiter width of one long bracket match
///
/// Lives on the stack of a single [`RawString`] match and is written exactly
/// once, by the opener.
#[derive(Debug, Default)]
pub struct RawStringState {
    width: usize,
}

impl RawStringState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters in the opening delimiter, brackets included
    pub fn width(&self) -> usize {
        self.width
    }

    fn record(&mut self, width: usize) {
        debug_assert_eq!(self.width, 0, "delimiter width recorded twice");
        self.width = width;
    }

    /// Consume the closing delimiter the content loop stopped in front of
    fn commit(&self, cursor: &mut dyn Cursor) {
        cursor.advance(self.width);
    }
}

/// Opening long bracket; records the width
#[derive(Debug, Clone, Copy)]
struct RawStringOpen {
    open: char,
    marker: char,
}

impl Rule<RawStringState> for RawStringOpen {
    fn name(&self) -> &str {
        "raw_string_open"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn hook_exempt(&self) -> bool {
        true
    }

    fn match_raw(&self, m: &mut dyn Matcher, state: &mut RawStringState) -> Result<bool> {
        let cursor = m.cursor();
        if cursor.peek(0) != Some(self.open) {
            return Ok(false);
        }
        let mut i = 1;
        while cursor.remaining_at_least(i + 1) {
            match cursor.peek(i) {
                Some(ch) if ch == self.open => {
                    state.record(i + 1);
                    cursor.advance(i + 1);
                    m.match_eol();
                    return Ok(true);
                }
                Some(ch) if ch == self.marker => i += 1,
                _ => return Ok(false),
            }
        }
        Ok(false)
    }
}

/// Lookahead for a closing long bracket of the recorded width
#[derive(Debug, Clone, Copy)]
struct AtRawStringClose {
    marker: char,
    close: char,
}

impl Rule<RawStringState> for AtRawStringClose {
    fn name(&self) -> &str {
        "at_raw_string_close"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Opt
    }

    fn hook_exempt(&self) -> bool {
        true
    }

    fn match_raw(&self, m: &mut dyn Matcher, state: &mut RawStringState) -> Result<bool> {
        let width = state.width();
        let cursor = m.cursor();
        if width < 2 || !cursor.remaining_at_least(width) {
            return Ok(false);
        }
        if cursor.peek(0) != Some(self.close) || cursor.peek(width - 1) != Some(self.close) {
            return Ok(false);
        }
        Ok((1..width - 1).all(|i| cursor.peek(i) == Some(self.marker)))
    }
}

/// Literal body: content units until the closing lookahead succeeds
struct RawStringContent<'r> {
    name: &'r str,
    close: &'r AtRawStringClose,
    contents: &'r [BoxedRule],
}

impl Rule<RawStringState> for RawStringContent<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn match_raw(&self, m: &mut dyn Matcher, state: &mut RawStringState) -> Result<bool> {
        loop {
            if dispatch(m, self.close, state)? {
                return Ok(true);
            }
            if m.cursor().is_empty() {
                return Ok(false);
            }
            if self.contents.is_empty() {
                m.cursor().advance(1);
                continue;
            }
            let before = m.cursor().position().offset;
            for rule in self.contents {
                if !dispatch_rule(m, rule.as_ref())? {
                    return Ok(false);
                }
            }
            // a unit that consumes nothing never reaches the closer
            if m.cursor().position().offset == before {
                return Ok(false);
            }
        }
    }
}

/// Long bracket literal rule
///
/// Hooks bound to [`RawString::content_name`] see exactly the literal body;
/// hooks bound to the rule's own name see the whole literal with delimiters.
pub struct RawString {
    name: String,
    content_name: String,
    open: RawStringOpen,
    close: AtRawStringClose,
    contents: Vec<BoxedRule>,
}

impl RawString {
    /// Raw string with custom delimiters; content defaults to any character
    pub fn new(open: char, marker: char, close: char) -> Self {
        Self {
            name: "raw_string".to_string(),
            content_name: "raw_string.content".to_string(),
            open: RawStringOpen { open, marker },
            close: AtRawStringClose { marker, close },
            contents: Vec::new(),
        }
    }

    /// `[`, `=`, `]`
    pub fn lua() -> Self {
        Self::new('[', '=', ']')
    }

    pub fn from_config(config: &RawStringConfig) -> Self {
        Self::new(config.open, config.marker, config.close)
    }

    /// Rename the rule; the content rule becomes `<name>.content`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.content_name = format!("{}.content", self.name);
        self
    }

    /// Append a rule that one content unit must match, in sequence
    pub fn with_content(mut self, rule: impl Rule + 'static) -> Self {
        self.contents.push(Box::new(rule));
        self
    }

    pub fn content_name(&self) -> &str {
        &self.content_name
    }

    fn content(&self) -> RawStringContent<'_> {
        RawStringContent {
            name: &self.content_name,
            close: &self.close,
            contents: &self.contents,
        }
    }
}

impl Rule for RawString {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn children(&self) -> Vec<RuleInfo> {
        let mut content = self.content().info();
        content.children.push(self.close.info());
        content
            .children
            .extend(self.contents.iter().map(|rule| rule.info()));
        vec![self.open.info(), content]
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let mut state = RawStringState::new();
        if !dispatch(m, &self.open, &mut state)? {
            return Ok(false);
        }
        if !dispatch(m, &self.content(), &mut state)? {
            return Err(m.raise(&self.content_name));
        }
        state.commit(m.cursor());
        Ok(true)
    }
}
