//! Result type alias for strata operations

use crate::error::StrataError;

/// Standard Result type for strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Replace an error that only affects the current input with a value
    ///
    /// Errors that are not recoverable are passed through unchanged.
    fn recover_with(self, recover: impl FnOnce(StrataError) -> T) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recover_with(self, recover: impl FnOnce(StrataError) -> T) -> Result<T> {
        match self {
            Err(err) if err.is_recoverable() => {
                tracing::debug!("Recovering from error: {}", err);
                Ok(recover(err))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_with_keeps_contract_errors() {
        let failed: Result<&str> = Err(StrataError::missing_hook("word"));
        assert!(failed.recover_with(|_| "recovered").is_err());

        let fatal_match: Result<String> = Err(StrataError::depth_limit_exceeded("expr", 8));
        let recovered = fatal_match.recover_with(|err| err.to_string()).unwrap();
        assert_eq!(recovered, "Match depth limit of 8 exceeded in rule 'expr'");

        let ok: Result<u8> = Ok(1);
        assert_eq!(ok.recover_with(|_| 0).unwrap(), 1);
    }
}
