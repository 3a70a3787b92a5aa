//! Strata Core
//!
//! A parsing-expression-grammar execution core. Rules are matched against a
//! character cursor through a single dispatcher that handles backtracking,
//! lifecycle notifications and user hooks. Hook strategies are selected once,
//! when an action table is compiled, so grammars without hooks pay nothing
//! for them at match time.
//!
//! The crate also provides Lua-style long bracket literals ([`RawString`]) and
//! a scanner that reports every such literal in a text.

pub mod config;
pub mod error;
pub mod hooks;
pub mod input;
pub mod raw_string;
pub mod result;
pub mod rule;
pub mod scan;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigLoader, MatchingConfig, RawStringConfig, StrataConfig};
pub use error::{ErrorKind, StrataError};
pub use hooks::{
    ActionTable, Actions, ApplyMode, Control, Hook, HookDecl, HookShape, Matched, NormalControl,
    Strategy, TracingControl,
};
pub use input::{Cursor, EolKind, EolMatch, EolPolicy, MemoryInput, Position};
pub use raw_string::{RawString, RawStringState};
pub use result::{Result, ResultExt};
pub use rule::{BoxedRule, Matcher, Rule, RuleInfo, RuleShape, dispatch, dispatch_rule};
pub use scan::{Literal, Scanner, scan};
pub use session::{DEFAULT_MAX_DEPTH, Session};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
