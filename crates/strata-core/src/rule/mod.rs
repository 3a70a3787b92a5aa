//! Rules and the dispatcher
//!
//! A [`Rule`] is an immutable matching unit. It never calls another rule's
//! [`Rule::match_raw`] directly; every sub-match goes through [`dispatch`],
//! which owns backtracking, lifecycle notifications and hook invocation.
//!
//! The matching context is the object-safe [`Matcher`] trait, so grammars can
//! be composed from boxed rule values without knowing the cursor type or the
//! caller's hook state.

mod ascii;
mod combinators;

pub use ascii::{Any, Eof, Eol, NotOne, One, Range, Str, any, eof, eol, not_one, one, range, string};
pub use combinators::{
    At, Must, Named, NotAt, Opt, Plus, Seq, Sor, Star, Until, at, must, named, not_at, opt, plus,
    seq, sor, star, until,
};

use serde::Serialize;

use crate::error::StrataError;
use crate::hooks::ApplyMode;
use crate::input::{Cursor, EolMatch, Position};
use crate::result::Result;

/// Structural shape of a rule, consumed by grammar analysis passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleShape {
    /// Consumes input whenever it succeeds
    Any,
    /// May succeed without consuming input
    Opt,
    /// All children in order
    Seq,
    /// First matching child
    Sor,
    /// Children repeated until they stop matching
    Rep,
}

/// Static description of a rule and its sub-rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub name: String,
    pub shape: RuleShape,
    pub hook_exempt: bool,
    pub children: Vec<RuleInfo>,
}

impl RuleInfo {
    /// Depth-first walk over this rule and everything below it
    pub fn walk(&self, visit: &mut dyn FnMut(&RuleInfo)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// A grammar rule
///
/// `L` is attempt-local state threaded from a parent rule to its private
/// helpers (for example the delimiter width of a long bracket). Ordinary
/// rules use the default `()`.
///
/// `match_raw` returns `Ok(false)` for a mismatch and must leave the cursor
/// untouched in that case; [`dispatch`] rewinds regardless. `Err` is reserved
/// for failures that abort the whole parse.
pub trait Rule<L: ?Sized = ()>: Send + Sync {
    /// Name used for hook binding and diagnostics
    fn name(&self) -> &str;

    fn shape(&self) -> RuleShape;

    /// Exempt rules bypass lifecycle notifications and hooks entirely
    fn hook_exempt(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<RuleInfo> {
        Vec::new()
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            name: self.name().to_string(),
            shape: self.shape(),
            hook_exempt: self.hook_exempt(),
            children: self.children(),
        }
    }

    fn match_raw(&self, m: &mut dyn Matcher, local: &mut L) -> Result<bool>;
}

/// Boxed rule as stored in combinators
pub type BoxedRule = Box<dyn Rule>;

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn shape(&self) -> RuleShape {
        (**self).shape()
    }

    fn hook_exempt(&self) -> bool {
        (**self).hook_exempt()
    }

    fn children(&self) -> Vec<RuleInfo> {
        (**self).children()
    }

    fn match_raw(&self, m: &mut dyn Matcher, local: &mut ()) -> Result<bool> {
        (**self).match_raw(m, local)
    }
}

/// Matching context seen by rules
///
/// Implemented by [`crate::Session`]. The lifecycle methods are only meant to
/// be called from [`dispatch`].
pub trait Matcher {
    fn cursor(&mut self) -> &mut dyn Cursor;

    /// Run the configured line ending policy at the cursor
    fn match_eol(&mut self) -> EolMatch;

    fn apply_mode(&self) -> ApplyMode;

    fn set_apply_mode(&mut self, mode: ApplyMode);

    /// Enter a rule; fails when the depth guard is exceeded
    fn enter(&mut self, rule: &str) -> Result<()>;

    fn leave(&mut self);

    fn start(&mut self, rule: &str);

    fn success(&mut self, rule: &str);

    fn failure(&mut self, rule: &str);

    /// A fatal error is propagating out of `rule`
    fn unwind(&mut self, rule: &str);

    /// Build the fatal error for a failed required match
    fn raise(&mut self, rule: &str) -> StrataError;

    /// Invoke the hook selected for `rule` over the text matched since `start`
    ///
    /// Returns the resulting match status: `true` unless a status hook vetoed.
    fn apply(&mut self, rule: &str, start: &Position) -> bool;
}

/// Match `rule` at the cursor, running lifecycle notifications and hooks
pub fn dispatch<L, R>(m: &mut dyn Matcher, rule: &R, local: &mut L) -> Result<bool>
where
    L: ?Sized,
    R: Rule<L> + ?Sized,
{
    let start = m.cursor().position();

    if rule.hook_exempt() {
        let matched = rule.match_raw(m, local)?;
        if !matched {
            m.cursor().rewind(start);
        }
        return Ok(matched);
    }

    let name = rule.name();
    m.enter(name)?;
    m.start(name);
    let outcome = rule.match_raw(m, local);
    m.leave();

    let matched = match outcome {
        Ok(matched) => matched,
        Err(err) => {
            m.unwind(name);
            return Err(err);
        }
    };
    if !matched {
        m.failure(name);
        m.cursor().rewind(start);
        return Ok(false);
    }

    m.success(name);
    if m.apply(name, &start) {
        Ok(true)
    } else {
        m.cursor().rewind(start);
        Ok(false)
    }
}

/// [`dispatch`] for rules without attempt-local state
pub fn dispatch_rule<R: Rule + ?Sized>(m: &mut dyn Matcher, rule: &R) -> Result<bool> {
    dispatch(m, rule, &mut ())
}
