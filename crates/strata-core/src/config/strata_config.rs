//! Configuration types for strata

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::StrataError;
use crate::input::EolKind;
use crate::result::Result;
use crate::session::DEFAULT_MAX_DEPTH;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StrataConfig {
    /// Matching limits and line ending policy
    pub matching: MatchingConfig,

    /// Long bracket delimiter characters
    pub raw_string: RawStringConfig,
}

/// Matching configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingConfig {
    /// Maximum number of nested rule activations
    pub max_depth: usize,

    /// Line ending policy used by `eol` and the long bracket opener
    pub eol: EolKind,

    /// Log every rule activation at TRACE level
    pub trace: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            eol: EolKind::default(),
            trace: false,
        }
    }
}

/// Delimiter characters of long bracket literals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawStringConfig {
    pub open: char,
    pub marker: char,
    pub close: char,
}

impl Default for RawStringConfig {
    fn default() -> Self {
        Self {
            open: '[',
            marker: '=',
            close: ']',
        }
    }
}

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format implied by a file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl StrataConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| StrataError::io_error(path, e))?;
        let config = Self::parse(&content, ConfigFormat::from_path(path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| StrataError::config_error(format!("Invalid TOML: {e}"))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| StrataError::config_error(format!("Invalid JSON: {e}"))),
        }
    }

    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| StrataError::config_error(format!("Cannot render TOML: {e}"))),
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| StrataError::config_error(format!("Cannot render JSON: {e}"))),
        }
    }

    /// Reject settings the matcher cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.matching.max_depth == 0 {
            return Err(StrataError::config_error("matching.maxDepth must be at least 1"));
        }
        let RawStringConfig {
            open,
            marker,
            close,
        } = self.raw_string;
        if marker == open || marker == close {
            return Err(StrataError::config_error(format!(
                "rawString.marker '{marker}' must differ from the bracket characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = StrataConfig::parse("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, StrataConfig::default());
        assert_eq!(config.matching.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.matching.eol, EolKind::LfCrlf);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = StrataConfig::parse(
            r#"
            [matching]
            eol = "cr_lf_crlf"

            [rawString]
            open = "<"
            close = ">"
            "#,
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.matching.eol, EolKind::CrLfCrlf);
        assert_eq!(config.matching.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.raw_string.open, '<');
        assert_eq!(config.raw_string.marker, '=');
    }

    #[test]
    fn json_and_toml_render_round_trip() {
        let mut config = StrataConfig::default();
        config.matching.trace = true;
        config.raw_string.marker = '#';

        for format in [ConfigFormat::Toml, ConfigFormat::Json] {
            let rendered = config.render(format).unwrap();
            assert_eq!(StrataConfig::parse(&rendered, format).unwrap(), config);
        }
    }

    #[test]
    fn validate_rejects_marker_equal_to_bracket() {
        let mut config = StrataConfig::default();
        config.raw_string.marker = '[';
        assert!(config.validate().is_err());

        config.raw_string.marker = '=';
        config.matching.max_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = StrataConfig::parse("{ matching: ", ConfigFormat::Json).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Invalid JSON"));
    }
}
