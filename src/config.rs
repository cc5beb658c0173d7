//! Search configuration, loadable from TOML.
//!
//! Every key is optional:
//!
//! ```toml
//! limit = 7
//!
//! [build]
//! encode = "simple"     # false | "icase" | "simple"
//! tokenize = "forward"  # "strict" | "forward" | "reverse" | "full"
//! split = "[^0-9A-Za-z_]+"
//! ```

use crate::error::Result;
use crate::search::tokenize::{DEFAULT_SPLIT, Encoding, TokenizeMode};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hits kept per field per partition when the caller does not say otherwise.
pub const DEFAULT_LIMIT: usize = 7;

/// Options for the default partition's tokenizer.
///
/// The Cyrillic and CJK partitions use fixed tokenizers and ignore these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub encode: Encoding,
    pub tokenize: TokenizeMode,
    /// Regex matching the separators between words.
    pub split: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            encode: Encoding::Simple,
            tokenize: TokenizeMode::Forward,
            split: DEFAULT_SPLIT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub build: BuildOptions,
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).context("Failed to parse search config")?;
        if config.limit == 0 {
            tracing::warn!(
                "Search limit of 0 would hide every result, using {}",
                DEFAULT_LIMIT
            );
            config.limit = DEFAULT_LIMIT;
        }
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read search config at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid search config in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SearchConfig::from_toml_str("").unwrap();
        check!(config == SearchConfig::default());
        check!(config.limit == 7);
        check!(config.build.encode == Encoding::Simple);
        check!(config.build.tokenize == TokenizeMode::Forward);
        check!(config.build.split == DEFAULT_SPLIT);
    }

    #[test]
    fn test_partial_build_section() {
        let config = SearchConfig::from_toml_str(
            r#"
            limit = 3

            [build]
            encode = false
            tokenize = "strict"
            "#,
        )
        .unwrap();
        check!(config.limit == 3);
        check!(config.build.encode == Encoding::None);
        check!(config.build.tokenize == TokenizeMode::Strict);
        check!(config.build.split == DEFAULT_SPLIT);
    }

    #[test]
    fn test_zero_limit_falls_back() {
        let config = SearchConfig::from_toml_str("limit = 0").unwrap();
        check!(config.limit == DEFAULT_LIMIT);
    }

    #[test]
    fn test_unknown_tokenize_mode_is_rejected() {
        let result = SearchConfig::from_toml_str("[build]\ntokenize = \"sideways\"");
        check!(result.is_err());
    }
}
