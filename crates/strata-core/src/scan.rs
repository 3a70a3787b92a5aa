//! Long bracket literal scanner
//!
//! Walks a whole source text and reports every long bracket literal in it.
//! Anything that is not a literal is skipped one character at a time. An
//! opener without a matching closer aborts the scan with a
//! [`StrataError::RequiredMatch`](crate::StrataError::RequiredMatch).

use serde::Serialize;
use tracing::debug;

use crate::config::StrataConfig;
use crate::hooks::{ActionTable, Actions, ApplyMode, Control, HookDecl, NormalControl, TracingControl};
use crate::input::{MemoryInput, Position};
use crate::raw_string::RawString;
use crate::result::Result;
use crate::rule::{Rule, any, sor, star};
use crate::session::Session;

/// One literal found in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// Position of the opening bracket
    pub start: Position,
    pub level: usize,
    /// Body without delimiters or the line break after the opener
    pub content: String,
    /// Characters consumed, delimiters included
    pub length: usize,
}

#[derive(Debug, Default)]
struct ScanState {
    content: Option<String>,
    literals: Vec<Literal>,
}

/// Reusable scanner for one delimiter configuration
pub struct Scanner {
    config: StrataConfig,
    grammar: Box<dyn Rule>,
    actions: ActionTable<ScanState>,
}

impl Scanner {
    pub fn new(config: StrataConfig) -> Result<Self> {
        config.validate()?;

        let literal = RawString::from_config(&config.raw_string).named("literal");
        let content_name = literal.content_name().to_string();
        let marker = config.raw_string.marker;

        let actions = Actions::new()
            .on(
                content_name,
                HookDecl::new().with_state(|m, state: &mut ScanState| {
                    state.content = Some(m.text.to_string());
                }),
            )
            .on(
                "literal",
                HookDecl::new().with_state(move |m, state: &mut ScanState| {
                    let level = m
                        .text
                        .chars()
                        .skip(1)
                        .take_while(|ch| *ch == marker)
                        .count();
                    state.literals.push(Literal {
                        start: m.start,
                        level,
                        content: state.content.take().unwrap_or_default(),
                        length: m.text.chars().count(),
                    });
                }),
            )
            .compile(ApplyMode::Action)?;

        let grammar: Box<dyn Rule> = Box::new(star(vec![Box::new(sor(vec![
            Box::new(literal),
            Box::new(any()),
        ]))]));
        actions.validate(&grammar.info())?;

        Ok(Self {
            config,
            grammar,
            actions,
        })
    }

    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    /// Find every literal in `source`
    pub fn scan(&self, source: &str) -> Result<Vec<Literal>> {
        if self.config.matching.trace {
            self.scan_with(source, TracingControl::new())
        } else {
            self.scan_with(source, NormalControl)
        }
    }

    fn scan_with<C: Control>(&self, source: &str, control: C) -> Result<Vec<Literal>> {
        let mut input = MemoryInput::new(source);
        let mut state = ScanState::default();
        let mut session = Session::new(&mut input, &self.actions, &mut state)
            .with_options(&self.config.matching)
            .with_control(control);
        session.parse(self.grammar.as_ref())?;
        drop(session);

        debug!("Found {} literal(s)", state.literals.len());
        Ok(state.literals)
    }
}

/// Scan `source` with the given configuration
pub fn scan(source: &str, config: &StrataConfig) -> Result<Vec<Literal>> {
    Scanner::new(config.clone())?.scan(source)
}
