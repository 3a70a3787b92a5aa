//! Line ending policies
//!
//! A policy consumes at most one line terminator at the cursor. "No terminator
//! here" is a successful no-op; policies never report failure.

use serde::{Deserialize, Serialize};

use super::Cursor;

/// Outcome of an end-of-line probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EolMatch {
    /// A terminator was found and consumed
    pub consumed: bool,
    /// Characters that were available for inspection (at most two)
    pub available: usize,
}

/// Pluggable line-ending matcher
pub trait EolPolicy: Send + Sync {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch;
}

fn available(cursor: &dyn Cursor) -> usize {
    (0..=2)
        .rev()
        .find(|n| cursor.remaining_at_least(*n))
        .unwrap_or(0)
}

fn consume(cursor: &mut dyn Cursor, len: usize, available: usize) -> EolMatch {
    cursor.advance_across_line(len);
    EolMatch {
        consumed: true,
        available,
    }
}

fn skip(available: usize) -> EolMatch {
    EolMatch {
        consumed: false,
        available,
    }
}

/// `\n` only
#[derive(Debug, Clone, Copy, Default)]
pub struct LfEol;

impl EolPolicy for LfEol {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch {
        let avail = available(cursor);
        match cursor.peek(0) {
            Some('\n') => consume(cursor, 1, avail),
            _ => skip(avail),
        }
    }
}

/// `\r` only
#[derive(Debug, Clone, Copy, Default)]
pub struct CrEol;

impl EolPolicy for CrEol {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch {
        let avail = available(cursor);
        match cursor.peek(0) {
            Some('\r') => consume(cursor, 1, avail),
            _ => skip(avail),
        }
    }
}

/// `\r\n` only
#[derive(Debug, Clone, Copy, Default)]
pub struct CrlfEol;

impl EolPolicy for CrlfEol {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch {
        let avail = available(cursor);
        if avail > 1 && cursor.peek(0) == Some('\r') && cursor.peek(1) == Some('\n') {
            return consume(cursor, 2, avail);
        }
        skip(avail)
    }
}

/// `\n` or `\r\n`
#[derive(Debug, Clone, Copy, Default)]
pub struct LfCrlfEol;

impl EolPolicy for LfCrlfEol {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch {
        let avail = available(cursor);
        match (cursor.peek(0), cursor.peek(1)) {
            (Some('\n'), _) => consume(cursor, 1, avail),
            (Some('\r'), Some('\n')) => consume(cursor, 2, avail),
            _ => skip(avail),
        }
    }
}

/// `\r\n`, `\r` or `\n`
#[derive(Debug, Clone, Copy, Default)]
pub struct CrLfCrlfEol;

impl EolPolicy for CrLfCrlfEol {
    fn match_eol(&self, cursor: &mut dyn Cursor) -> EolMatch {
        let avail = available(cursor);
        match (cursor.peek(0), cursor.peek(1)) {
            (Some('\r'), Some('\n')) => consume(cursor, 2, avail),
            (Some('\r'), _) | (Some('\n'), _) => consume(cursor, 1, avail),
            _ => skip(avail),
        }
    }
}

/// Configurable choice of line ending policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EolKind {
    Lf,
    Cr,
    Crlf,
    #[default]
    LfCrlf,
    CrLfCrlf,
}

impl EolKind {
    pub fn policy(self) -> &'static dyn EolPolicy {
        match self {
            EolKind::Lf => &LfEol,
            EolKind::Cr => &CrEol,
            EolKind::Crlf => &CrlfEol,
            EolKind::LfCrlf => &LfCrlfEol,
            EolKind::CrLfCrlf => &CrLfCrlfEol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MemoryInput;

    #[test]
    fn no_break_is_a_successful_no_op() {
        for kind in [
            EolKind::Lf,
            EolKind::Cr,
            EolKind::Crlf,
            EolKind::LfCrlf,
            EolKind::CrLfCrlf,
        ] {
            let mut input = MemoryInput::new("abc");
            let result = kind.policy().match_eol(&mut input);
            assert!(!result.consumed, "{kind:?}");
            assert_eq!(result.available, 2);
            assert_eq!(input.position().offset, 0);
        }
    }

    #[test]
    fn crlf_requires_both_characters() {
        let mut lone_cr = MemoryInput::new("\rx");
        assert!(!CrlfEol.match_eol(&mut lone_cr).consumed);

        let mut pair = MemoryInput::new("\r\nx");
        let result = CrlfEol.match_eol(&mut pair);
        assert!(result.consumed);
        assert_eq!(pair.position().line, 2);
        assert_eq!(pair.remaining(), "x");
    }

    #[test]
    fn lf_crlf_accepts_either_form() {
        let mut lf = MemoryInput::new("\nz");
        assert!(LfCrlfEol.match_eol(&mut lf).consumed);
        assert_eq!(lf.remaining(), "z");

        let mut crlf = MemoryInput::new("\r\nz");
        assert!(LfCrlfEol.match_eol(&mut crlf).consumed);
        assert_eq!(crlf.remaining(), "z");

        let mut cr = MemoryInput::new("\rz");
        assert!(!LfCrlfEol.match_eol(&mut cr).consumed);
    }

    #[test]
    fn cr_lf_crlf_prefers_the_pair() {
        let mut input = MemoryInput::new("\r\n\n");
        assert!(CrLfCrlfEol.match_eol(&mut input).consumed);
        assert_eq!(input.remaining(), "\n");
    }

    #[test]
    fn available_reflects_short_input() {
        let mut empty = MemoryInput::new("");
        let result = LfEol.match_eol(&mut empty);
        assert_eq!(result, EolMatch::default());
    }
}
