//! Configuration system for strata
//!
//! Configuration is optional: every field has a default, and a missing file
//! means "use the defaults".
//!
//! ## Configuration Files
//!
//! Searched in this order, starting from the working directory and moving up
//! until one is found or the filesystem root is reached:
//! - `strata.toml`
//! - `.stratarc.toml`
//! - `.stratarc.json`
//!
//! ## Example Configuration
//!
//! ```toml
//! [matching]
//! maxDepth = 512
//! eol = "crlf"
//! trace = false
//!
//! [rawString]
//! open = "["
//! marker = "="
//! close = "]"
//! ```

mod loader;
mod strata_config;

pub use loader::ConfigLoader;
pub use strata_config::{ConfigFormat, MatchingConfig, RawStringConfig, StrataConfig};
