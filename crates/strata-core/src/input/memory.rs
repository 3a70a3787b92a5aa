use super::{Cursor, Position};

/// Cursor over a borrowed string
///
/// Characters are indexed once up front so lookahead at any offset is O(1).
#[derive(Debug, Clone)]
pub struct MemoryInput<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    position: Position,
}

impl<'a> MemoryInput<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            position: Position::start(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Unconsumed remainder of the input
    pub fn remaining(&self) -> &'a str {
        &self.source[self.position.byte..]
    }

    /// Total number of characters in the input
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    fn byte_at(&self, offset: usize) -> usize {
        self.chars
            .get(offset)
            .map(|(byte, _)| *byte)
            .unwrap_or(self.source.len())
    }

    fn clamp(&self, n: usize) -> usize {
        let left = self.chars.len() - self.position.offset;
        debug_assert!(n <= left, "advance by {n} with only {left} characters left");
        n.min(left)
    }
}

impl Cursor for MemoryInput<'_> {
    fn is_empty(&self) -> bool {
        self.position.offset >= self.chars.len()
    }

    fn remaining_at_least(&self, n: usize) -> bool {
        self.chars.len() - self.position.offset >= n
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars
            .get(self.position.offset + offset)
            .map(|(_, ch)| *ch)
    }

    fn advance(&mut self, n: usize) {
        let n = self.clamp(n);
        let start = self.position.offset;
        for &(_, ch) in &self.chars[start..start + n] {
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.position.offset += n;
        self.position.byte = self.byte_at(self.position.offset);
    }

    fn advance_across_line(&mut self, n: usize) {
        let n = self.clamp(n);
        self.position.offset += n;
        self.position.byte = self.byte_at(self.position.offset);
        self.position.line += 1;
        self.position.column = 1;
    }

    fn position(&self) -> Position {
        self.position
    }

    fn rewind(&mut self, to: Position) {
        self.position = to;
    }

    fn text_since(&self, start: &Position) -> &str {
        &self.source[start.byte..self.position.byte]
    }
}
