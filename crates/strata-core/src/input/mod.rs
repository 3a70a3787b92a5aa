//! Character cursor abstraction
//!
//! The matching core never owns its input. Rules see it only through the
//! [`Cursor`] contract: bounded lookahead, forward movement with line/column
//! bookkeeping, and rewinding to a previously saved [`Position`].
//!
//! [`MemoryInput`] is the in-memory implementation used by the scanner, the
//! CLI and the tests. Line endings are recognised by a pluggable [`EolPolicy`].

mod eol;
mod memory;

pub use eol::{CrEol, CrLfCrlfEol, CrlfEol, EolKind, EolMatch, EolPolicy, LfCrlfEol, LfEol};
pub use memory::MemoryInput;

use serde::Serialize;

/// A location in the input
///
/// `offset` counts characters, `byte` is the matching UTF-8 byte index.
/// Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub offset: usize,
    pub byte: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Position of the first character of an input
    pub const fn start() -> Self {
        Self {
            offset: 0,
            byte: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Read-only lookahead plus forward movement over a character stream
///
/// Rules must check availability with [`Cursor::remaining_at_least`] before
/// peeking past the first character; `peek` returns `None` out of bounds.
pub trait Cursor {
    /// True when no characters remain
    fn is_empty(&self) -> bool;

    /// True when at least `n` characters remain
    fn remaining_at_least(&self, n: usize) -> bool;

    /// Character `offset` places ahead of the current position
    fn peek(&self, offset: usize) -> Option<char>;

    /// Consume `n` characters, counting any line feeds among them
    fn advance(&mut self, n: usize);

    /// Consume `n` characters that end with a line terminator
    fn advance_across_line(&mut self, n: usize);

    fn position(&self) -> Position;

    /// Restore a position previously obtained from this cursor
    fn rewind(&mut self, to: Position);

    /// Text consumed between `start` and the current position
    fn text_since(&self, start: &Position) -> &str;
}
