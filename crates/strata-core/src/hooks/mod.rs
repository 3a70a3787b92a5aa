//! Semantic hooks and strategy selection
//!
//! A hook provider is a [`HookDecl`]: it may expose any of four hook forms,
//! niladic or state-taking, each returning either nothing or a status. The
//! capability probe ([`HookDecl::probe`]) runs when an [`Actions`] set is
//! compiled into an [`ActionTable`], so ambiguous or empty providers are
//! rejected before any input is read. Matching then only performs a tag
//! dispatch over the selected [`Hook`] variant.
//!
//! ```rust,ignore
//! let table = Actions::<Vec<String>>::new()
//!     .on("word", HookDecl::new().with_state(|m, words| words.push(m.text.to_string())))
//!     .compile(ApplyMode::Action)?;
//! ```

mod control;

pub use control::{Control, NormalControl, TracingControl};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StrataError;
use crate::input::Position;
use crate::result::Result;
use crate::rule::RuleInfo;

/// Whether hooks run during a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    #[default]
    Action,
    Nothing,
}

/// Text matched by a rule, as handed to state-taking hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched<'a> {
    pub text: &'a str,
    pub start: Position,
}

/// The four recognised hook forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HookShape {
    /// `fn()`
    Unit,
    /// `fn() -> bool`
    Status,
    /// `fn(&Matched, &mut S)`
    UnitWithState,
    /// `fn(&Matched, &mut S) -> bool`
    StatusWithState,
}

/// Dispatch strategy chosen for a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Lifecycle notifications only
    Control,
    Hook(HookShape),
}

type UnitFn = Box<dyn Fn() + Send + Sync>;
type StatusFn = Box<dyn Fn() -> bool + Send + Sync>;
type UnitWithStateFn<S> = Box<dyn Fn(&Matched<'_>, &mut S) + Send + Sync>;
type StatusWithStateFn<S> = Box<dyn Fn(&Matched<'_>, &mut S) -> bool + Send + Sync>;

/// Hook provider for one rule
pub struct HookDecl<S> {
    unit: Option<UnitFn>,
    status: Option<StatusFn>,
    with_state: Option<UnitWithStateFn<S>>,
    status_with_state: Option<StatusWithStateFn<S>>,
    /// Forms declared again after a merge; each one makes the provider ambiguous
    repeated: usize,
}

impl<S> Default for HookDecl<S> {
    fn default() -> Self {
        Self {
            unit: None,
            status: None,
            with_state: None,
            status_with_state: None,
            repeated: 0,
        }
    }
}

impl<S> HookDecl<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.unit = Some(Box::new(hook));
        self
    }

    pub fn status(mut self, hook: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.status = Some(Box::new(hook));
        self
    }

    pub fn with_state(
        mut self,
        hook: impl Fn(&Matched<'_>, &mut S) + Send + Sync + 'static,
    ) -> Self {
        self.with_state = Some(Box::new(hook));
        self
    }

    pub fn status_with_state(
        mut self,
        hook: impl Fn(&Matched<'_>, &mut S) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.status_with_state = Some(Box::new(hook));
        self
    }

    /// Hook forms this provider exposes
    pub fn shapes(&self) -> Vec<HookShape> {
        let mut shapes = Vec::new();
        if self.unit.is_some() {
            shapes.push(HookShape::Unit);
        }
        if self.status.is_some() {
            shapes.push(HookShape::Status);
        }
        if self.with_state.is_some() {
            shapes.push(HookShape::UnitWithState);
        }
        if self.status_with_state.is_some() {
            shapes.push(HookShape::StatusWithState);
        }
        shapes
    }

    /// Select the dispatch strategy for `rule` under `mode`
    ///
    /// With hooks off nothing is checked and the strategy is lifecycle-only.
    pub fn probe(&self, rule: &str, mode: ApplyMode) -> Result<Strategy> {
        if mode == ApplyMode::Nothing {
            return Ok(Strategy::Control);
        }
        match (self.shapes().as_slice(), self.repeated) {
            ([], _) => Err(StrataError::missing_hook(rule)),
            ([shape], 0) => Ok(Strategy::Hook(*shape)),
            (shapes, repeated) => Err(StrataError::ambiguous_hook(rule, shapes.len() + repeated)),
        }
    }

    /// Move the other provider's forms into this one
    ///
    /// A form both providers declare is counted as repeated.
    fn merge(&mut self, other: HookDecl<S>) {
        let incoming = other.shapes();
        self.repeated += other.repeated
            + self
                .shapes()
                .iter()
                .filter(|shape| incoming.contains(shape))
                .count();
        self.unit = other.unit.or(self.unit.take());
        self.status = other.status.or(self.status.take());
        self.with_state = other.with_state.or(self.with_state.take());
        self.status_with_state = other.status_with_state.or(self.status_with_state.take());
    }

    fn into_hook(self, strategy: Strategy) -> Option<Hook<S>> {
        match strategy {
            Strategy::Control => None,
            Strategy::Hook(HookShape::Unit) => self.unit.map(Hook::Unit),
            Strategy::Hook(HookShape::Status) => self.status.map(Hook::Status),
            Strategy::Hook(HookShape::UnitWithState) => self.with_state.map(Hook::UnitWithState),
            Strategy::Hook(HookShape::StatusWithState) => {
                self.status_with_state.map(Hook::StatusWithState)
            }
        }
    }
}

/// A selected hook, exactly one form
pub enum Hook<S> {
    Unit(UnitFn),
    Status(StatusFn),
    UnitWithState(UnitWithStateFn<S>),
    StatusWithState(StatusWithStateFn<S>),
}

impl<S> Hook<S> {
    pub fn shape(&self) -> HookShape {
        match self {
            Hook::Unit(_) => HookShape::Unit,
            Hook::Status(_) => HookShape::Status,
            Hook::UnitWithState(_) => HookShape::UnitWithState,
            Hook::StatusWithState(_) => HookShape::StatusWithState,
        }
    }

    /// Run the hook; the result replaces the match status
    pub fn invoke(&self, matched: &Matched<'_>, state: &mut S) -> bool {
        match self {
            Hook::Unit(hook) => {
                hook();
                true
            }
            Hook::Status(hook) => hook(),
            Hook::UnitWithState(hook) => {
                hook(matched, state);
                true
            }
            Hook::StatusWithState(hook) => hook(matched, state),
        }
    }
}

/// Uncompiled hook declarations keyed by rule name
pub struct Actions<S> {
    decls: IndexMap<String, HookDecl<S>>,
}

impl<S> Default for Actions<S> {
    fn default() -> Self {
        Self {
            decls: IndexMap::new(),
        }
    }
}

impl<S> Actions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare hooks for `rule`; repeated declarations accumulate forms
    pub fn on(mut self, rule: impl Into<String>, decl: HookDecl<S>) -> Self {
        let rule = rule.into();
        match self.decls.get_mut(&rule) {
            Some(existing) => existing.merge(decl),
            None => {
                self.decls.insert(rule, decl);
            }
        }
        self
    }

    /// Probe every provider and freeze the result
    pub fn compile(self, mode: ApplyMode) -> Result<ActionTable<S>> {
        let mut hooks = IndexMap::with_capacity(self.decls.len());
        for (rule, decl) in self.decls {
            let strategy = decl.probe(&rule, mode)?;
            debug!("Rule '{}' dispatches with {:?}", rule, strategy);
            if let Some(hook) = decl.into_hook(strategy) {
                hooks.insert(rule, hook);
            }
        }
        Ok(ActionTable { mode, hooks })
    }
}

/// Compiled per-rule hooks
pub struct ActionTable<S> {
    mode: ApplyMode,
    hooks: IndexMap<String, Hook<S>>,
}

impl<S> ActionTable<S> {
    /// A table without hooks; only lifecycle notifications run
    pub fn nothing() -> Self {
        Self {
            mode: ApplyMode::Nothing,
            hooks: IndexMap::new(),
        }
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    pub fn get(&self, rule: &str) -> Option<&Hook<S>> {
        self.hooks.get(rule)
    }

    /// Strategy used when `rule` matches
    pub fn strategy(&self, rule: &str) -> Strategy {
        match (self.mode, self.hooks.get(rule)) {
            (ApplyMode::Action, Some(hook)) => Strategy::Hook(hook.shape()),
            _ => Strategy::Control,
        }
    }

    /// Check the table against a grammar
    ///
    /// Hooks on hook-exempt rules are rejected; hooks on names the grammar
    /// does not contain are only reported.
    pub fn validate(&self, grammar: &RuleInfo) -> Result<()> {
        let mut exempt = Vec::new();
        let mut known = Vec::new();
        grammar.walk(&mut |info| {
            if info.hook_exempt {
                exempt.push(info.name.clone());
            } else {
                known.push(info.name.clone());
            }
        });

        for rule in self.hooks.keys() {
            if exempt.contains(rule) {
                return Err(StrataError::hook_on_exempt_rule(rule.clone()));
            }
            if !known.contains(rule) {
                warn!("Hook declared for '{}', which the grammar never uses", rule);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleShape;

    type Log = Vec<String>;

    #[test]
    fn single_form_selects_its_strategy() {
        let decl = HookDecl::<Log>::new().status(|| true);
        assert_eq!(
            decl.probe("digit", ApplyMode::Action).unwrap(),
            Strategy::Hook(HookShape::Status)
        );

        let decl = HookDecl::<Log>::new().with_state(|m, log| log.push(m.text.into()));
        assert_eq!(
            decl.probe("digit", ApplyMode::Action).unwrap(),
            Strategy::Hook(HookShape::UnitWithState)
        );
    }

    #[test]
    fn two_forms_are_ambiguous() {
        let decl = HookDecl::<Log>::new().unit(|| {}).status_with_state(|_, _| true);
        let err = decl.probe("digit", ApplyMode::Action).unwrap_err();
        assert!(matches!(err, StrataError::AmbiguousHook { forms: 2, .. }));
    }

    #[test]
    fn empty_provider_is_missing_a_hook() {
        let err = Actions::<Log>::new()
            .on("digit", HookDecl::new())
            .compile(ApplyMode::Action)
            .err()
            .unwrap();
        assert!(matches!(err, StrataError::MissingHook { ref rule } if rule == "digit"));
    }

    #[test]
    fn nothing_mode_skips_the_probe() {
        let table = Actions::<Log>::new()
            .on("digit", HookDecl::new())
            .on("word", HookDecl::new().unit(|| {}).status(|| false))
            .compile(ApplyMode::Nothing)
            .unwrap();
        assert_eq!(table.strategy("digit"), Strategy::Control);
        assert_eq!(table.strategy("word"), Strategy::Control);
        assert!(table.get("word").is_none());
    }

    #[test]
    fn repeated_declarations_accumulate_forms() {
        let err = Actions::<Log>::new()
            .on("digit", HookDecl::new().unit(|| {}))
            .on("digit", HookDecl::new().status(|| true))
            .compile(ApplyMode::Action)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Ambiguous hook for rule 'digit': 2 hook forms declared, expected exactly one");
    }

    #[test]
    fn same_form_declared_twice_is_ambiguous() {
        let err = Actions::<Log>::new()
            .on("digit", HookDecl::new().unit(|| {}))
            .on("digit", HookDecl::new().unit(|| {}))
            .compile(ApplyMode::Action)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            StrataError::AmbiguousHook { ref rule, forms: 2 } if rule == "digit"
        ));
    }

    #[test]
    fn undeclared_rules_use_lifecycle_only() {
        let table = Actions::<Log>::new()
            .on("digit", HookDecl::new().unit(|| {}))
            .compile(ApplyMode::Action)
            .unwrap();
        assert_eq!(table.strategy("digit"), Strategy::Hook(HookShape::Unit));
        assert_eq!(table.strategy("letter"), Strategy::Control);
    }

    #[test]
    fn validate_rejects_hooks_on_exempt_rules() {
        let grammar = RuleInfo {
            name: "literal".into(),
            shape: RuleShape::Seq,
            hook_exempt: false,
            children: vec![RuleInfo {
                name: "opener".into(),
                shape: RuleShape::Any,
                hook_exempt: true,
                children: Vec::new(),
            }],
        };
        let table = Actions::<Log>::new()
            .on("opener", HookDecl::new().unit(|| {}))
            .compile(ApplyMode::Action)
            .unwrap();
        let err = table.validate(&grammar).unwrap_err();
        assert!(matches!(err, StrataError::HookOnExemptRule { .. }));

        let table = Actions::<Log>::new()
            .on("literal", HookDecl::new().unit(|| {}))
            .compile(ApplyMode::Action)
            .unwrap();
        assert!(table.validate(&grammar).is_ok());
    }
}
