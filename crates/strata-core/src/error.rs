//! Error types and handling for grammar construction and matching

use std::path::PathBuf;
use thiserror::Error;

use crate::input::Position;

/// Main error type for strata operations
///
/// An ordinary mismatch is never an error: rules report it as `Ok(false)`.
/// Everything in here is either a contract violation detected before input is
/// processed, or a failure that must abort the current parse.
#[derive(Debug, Error)]
pub enum StrataError {
    /// A hook provider exposes more than one hook form
    #[error("Ambiguous hook for rule '{rule}': {forms} hook forms declared, expected exactly one")]
    AmbiguousHook { rule: String, forms: usize },

    /// Hooks are enabled and a provider was declared, but it has no hook form
    #[error("Hooks enabled but no hook found for rule '{rule}'")]
    MissingHook { rule: String },

    /// A hook was declared for a rule that bypasses hooks entirely
    #[error("Rule '{rule}' is hook-exempt and cannot carry a hook")]
    HookOnExemptRule { rule: String },

    /// A rule wrapped in `must` did not match
    #[error("Required match failed for '{rule}' at line {line}, column {column}")]
    RequiredMatch {
        rule: String,
        line: usize,
        column: usize,
        offset: usize,
    },

    /// Grammar nesting exceeded the configured depth guard
    #[error("Match depth limit of {limit} exceeded in rule '{rule}'")]
    DepthLimitExceeded { rule: String, limit: usize },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Hook declarations rejected while compiling an action table
    Contract,
    /// Fatal failure while matching input
    Match,
    Config,
    Io,
}

impl StrataError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrataError::AmbiguousHook { .. }
            | StrataError::MissingHook { .. }
            | StrataError::HookOnExemptRule { .. } => ErrorKind::Contract,
            StrataError::RequiredMatch { .. } | StrataError::DepthLimitExceeded { .. } => {
                ErrorKind::Match
            }
            StrataError::ConfigError { .. } => ErrorKind::Config,
            StrataError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable (processing of other inputs can continue)
    ///
    /// A fatal match error only aborts the input it occurred in. Contract and
    /// configuration errors make every further parse meaningless.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Match | ErrorKind::Io)
    }

    /// Create an ambiguous hook error
    pub fn ambiguous_hook(rule: impl Into<String>, forms: usize) -> Self {
        Self::AmbiguousHook {
            rule: rule.into(),
            forms,
        }
    }

    /// Create a missing hook error
    pub fn missing_hook(rule: impl Into<String>) -> Self {
        Self::MissingHook { rule: rule.into() }
    }

    pub fn hook_on_exempt_rule(rule: impl Into<String>) -> Self {
        Self::HookOnExemptRule { rule: rule.into() }
    }

    /// Create a required match error at the given position
    pub fn required_match(rule: impl Into<String>, at: &Position) -> Self {
        Self::RequiredMatch {
            rule: rule.into(),
            line: at.line,
            column: at.column,
            offset: at.offset,
        }
    }

    pub fn depth_limit_exceeded(rule: impl Into<String>, limit: usize) -> Self {
        Self::DepthLimitExceeded {
            rule: rule.into(),
            limit,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_errors_are_not_recoverable() {
        let err = StrataError::ambiguous_hook("digits", 2);
        assert_eq!(err.kind(), ErrorKind::Contract);
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Ambiguous hook for rule 'digits': 2 hook forms declared, expected exactly one"
        );
    }

    #[test]
    fn required_match_carries_position() {
        let at = Position {
            offset: 7,
            byte: 7,
            line: 2,
            column: 3,
        };
        let err = StrataError::required_match("long.content", &at);
        assert_eq!(err.kind(), ErrorKind::Match);
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Required match failed for 'long.content' at line 2, column 3"
        );
    }
}
