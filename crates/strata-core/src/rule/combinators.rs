//! Structural combinators
//!
//! Children are boxed so grammars can be assembled at runtime from plain values.

use super::{BoxedRule, Matcher, Rule, RuleInfo, RuleShape, dispatch_rule};
use crate::hooks::ApplyMode;
use crate::result::Result;

fn infos(rules: &[BoxedRule]) -> Vec<RuleInfo> {
    rules.iter().map(|rule| rule.info()).collect()
}

/// Runs `rules` in order, stopping at the first mismatch
fn match_all(m: &mut dyn Matcher, rules: &[BoxedRule]) -> Result<bool> {
    for rule in rules {
        if !dispatch_rule(m, rule.as_ref())? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Repeats `rules` until they stop matching or stop making progress
fn repeat(m: &mut dyn Matcher, rules: &[BoxedRule]) -> Result<bool> {
    loop {
        let before = m.cursor().position();
        if !match_all(m, rules)? {
            m.cursor().rewind(before);
            return Ok(true);
        }
        // an empty repetition would loop forever
        if m.cursor().position().offset == before.offset {
            return Ok(true);
        }
    }
}

/// Runs `rule` with hooks disabled, restoring the previous mode afterwards
fn match_silently(m: &mut dyn Matcher, rule: &dyn Rule) -> Result<bool> {
    let previous = m.apply_mode();
    m.set_apply_mode(ApplyMode::Nothing);
    let outcome = dispatch_rule(m, rule);
    m.set_apply_mode(previous);
    outcome
}

/// Sequence: every child in order
pub struct Seq {
    rules: Vec<BoxedRule>,
}

pub fn seq(rules: Vec<BoxedRule>) -> Seq {
    Seq { rules }
}

impl Rule for Seq {
    fn name(&self) -> &str {
        "seq"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn children(&self) -> Vec<RuleInfo> {
        infos(&self.rules)
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        match_all(m, &self.rules)
    }
}

/// Ordered choice: the first child that matches
pub struct Sor {
    rules: Vec<BoxedRule>,
}

pub fn sor(rules: Vec<BoxedRule>) -> Sor {
    Sor { rules }
}

impl Rule for Sor {
    fn name(&self) -> &str {
        "sor"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Sor
    }

    fn children(&self) -> Vec<RuleInfo> {
        infos(&self.rules)
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        for rule in &self.rules {
            if dispatch_rule(m, rule.as_ref())? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Zero or more repetitions of a sequence
pub struct Star {
    rules: Vec<BoxedRule>,
}

pub fn star(rules: Vec<BoxedRule>) -> Star {
    Star { rules }
}

impl Rule for Star {
    fn name(&self) -> &str {
        "star"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Rep
    }

    fn children(&self) -> Vec<RuleInfo> {
        infos(&self.rules)
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        repeat(m, &self.rules)
    }
}

/// One or more repetitions of a sequence
pub struct Plus {
    rules: Vec<BoxedRule>,
}

pub fn plus(rules: Vec<BoxedRule>) -> Plus {
    Plus { rules }
}

impl Rule for Plus {
    fn name(&self) -> &str {
        "plus"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn children(&self) -> Vec<RuleInfo> {
        infos(&self.rules)
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        if !match_all(m, &self.rules)? {
            return Ok(false);
        }
        repeat(m, &self.rules)
    }
}

/// Optional sequence
pub struct Opt {
    rules: Vec<BoxedRule>,
}

pub fn opt(rules: Vec<BoxedRule>) -> Opt {
    Opt { rules }
}

impl Rule for Opt {
    fn name(&self) -> &str {
        "opt"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Opt
    }

    fn children(&self) -> Vec<RuleInfo> {
        infos(&self.rules)
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let before = m.cursor().position();
        if !match_all(m, &self.rules)? {
            m.cursor().rewind(before);
        }
        Ok(true)
    }
}

/// Positive lookahead; never consumes, hooks are off inside
pub struct At {
    rule: BoxedRule,
}

pub fn at(rule: BoxedRule) -> At {
    At { rule }
}

impl Rule for At {
    fn name(&self) -> &str {
        "at"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Opt
    }

    fn children(&self) -> Vec<RuleInfo> {
        vec![self.rule.info()]
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let before = m.cursor().position();
        let matched = match_silently(m, self.rule.as_ref())?;
        m.cursor().rewind(before);
        Ok(matched)
    }
}

/// Negative lookahead; never consumes, hooks are off inside
pub struct NotAt {
    rule: BoxedRule,
}

pub fn not_at(rule: BoxedRule) -> NotAt {
    NotAt { rule }
}

impl Rule for NotAt {
    fn name(&self) -> &str {
        "not_at"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Opt
    }

    fn children(&self) -> Vec<RuleInfo> {
        vec![self.rule.info()]
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        let before = m.cursor().position();
        let matched = match_silently(m, self.rule.as_ref())?;
        m.cursor().rewind(before);
        Ok(!matched)
    }
}

/// Required match: a mismatch becomes a fatal error
pub struct Must {
    rule: BoxedRule,
}

pub fn must(rule: BoxedRule) -> Must {
    Must { rule }
}

impl Rule for Must {
    fn name(&self) -> &str {
        "must"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn children(&self) -> Vec<RuleInfo> {
        vec![self.rule.info()]
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        if dispatch_rule(m, self.rule.as_ref())? {
            Ok(true)
        } else {
            Err(m.raise(self.rule.name()))
        }
    }
}

/// Consume `body` (or single characters when empty) until `cond` matches
///
/// `cond` is consumed as well; wrap it in [`at`] to stop in front of it. A
/// body that matches without consuming counts as a mismatch.
pub struct Until {
    cond: BoxedRule,
    body: Vec<BoxedRule>,
}

pub fn until(cond: BoxedRule, body: Vec<BoxedRule>) -> Until {
    Until { cond, body }
}

impl Rule for Until {
    fn name(&self) -> &str {
        "until"
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Seq
    }

    fn children(&self) -> Vec<RuleInfo> {
        let mut children = vec![self.cond.info()];
        children.extend(infos(&self.body));
        children
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        loop {
            if dispatch_rule(m, self.cond.as_ref())? {
                return Ok(true);
            }
            if m.cursor().is_empty() {
                return Ok(false);
            }
            if self.body.is_empty() {
                m.cursor().advance(1);
                continue;
            }
            let before = m.cursor().position().offset;
            if !match_all(m, &self.body)? || m.cursor().position().offset == before {
                return Ok(false);
            }
        }
    }
}

/// Gives a rule its own name so hooks can be bound to it
pub struct Named {
    name: String,
    rule: BoxedRule,
}

pub fn named(name: impl Into<String>, rule: BoxedRule) -> Named {
    Named {
        name: name.into(),
        rule,
    }
}

impl Rule for Named {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> RuleShape {
        self.rule.shape()
    }

    fn children(&self) -> Vec<RuleInfo> {
        vec![self.rule.info()]
    }

    fn match_raw(&self, m: &mut dyn Matcher, _: &mut ()) -> Result<bool> {
        dispatch_rule(m, self.rule.as_ref())
    }
}
