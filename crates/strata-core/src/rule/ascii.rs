//! Single-character and literal rules

use super::{Matcher, Rule, RuleShape};
use crate::result::Result;

/// Any single character
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

pub fn any() -> Any {
    Any
}

impl Rule for Any {
    fn name(&self) -> &str {
        "any"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let cursor = m.cursor();
        if cursor.is_empty() {
            return Ok(false);
        }
        cursor.advance(1);
        Ok(true)
    }
}

/// One character out of a set
#[derive(Debug, Clone)]
pub struct One {
    chars: Vec<char>,
}

pub fn one(chars: &str) -> One {
    One {
        chars: chars.chars().collect(),
    }
}

impl Rule for One {
    fn name(&self) -> &str {
        "one"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let cursor = m.cursor();
        match cursor.peek(0) {
            Some(ch) if self.chars.contains(&ch) => {
                cursor.advance(1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// One character not in a set
#[derive(Debug, Clone)]
pub struct NotOne {
    chars: Vec<char>,
}

pub fn not_one(chars: &str) -> NotOne {
    NotOne {
        chars: chars.chars().collect(),
    }
}

impl Rule for NotOne {
    fn name(&self) -> &str {
        "not_one"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let cursor = m.cursor();
        match cursor.peek(0) {
            Some(ch) if !self.chars.contains(&ch) => {
                cursor.advance(1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// One character in an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct Range {
    lo: char,
    hi: char,
}

pub fn range(lo: char, hi: char) -> Range {
    Range { lo, hi }
}

impl Rule for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let cursor = m.cursor();
        match cursor.peek(0) {
            Some(ch) if (self.lo..=self.hi).contains(&ch) => {
                cursor.advance(1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// An exact string
#[derive(Debug, Clone)]
pub struct Str {
    chars: Vec<char>,
}

pub fn string(text: &str) -> Str {
    Str {
        chars: text.chars().collect(),
    }
}

impl Rule for Str {
    fn name(&self) -> &str {
        "string"
    }

    fn shape(&self) -> RuleShape {
        if self.chars.is_empty() {
            RuleShape::Opt
        } else {
            RuleShape::Any
        }
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let cursor = m.cursor();
        if !cursor.remaining_at_least(self.chars.len()) {
            return Ok(false);
        }
        let matches = self
            .chars
            .iter()
            .enumerate()
            .all(|(i, ch)| cursor.peek(i) == Some(*ch));
        if matches {
            cursor.advance(self.chars.len());
        }
        Ok(matches)
    }
}

/// End of input
#[derive(Debug, Clone, Copy, Default)]
pub struct Eof;

pub fn eof() -> Eof {
    Eof
}

impl Rule for Eof {
    fn name(&self) -> &str {
        "eof"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Opt
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        Ok(m.cursor().is_empty())
    }
}

/// A line break as recognised by the session's line ending policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Eol;

pub fn eol() -> Eol {
    Eol
}

impl Rule for Eol {
    fn name(&self) -> &str {
        "eol"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Any
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        Ok(m.match_eol().consumed)
    }
}
