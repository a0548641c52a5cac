//! Resolver configuration.
//!
//! Loads settings from /etc/slideqa/config.toml or uses defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/slideqa/config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Knowledge tables to load instead of the embedded ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_path: Option<PathBuf>,

    /// Expand terse Yes/No answers into full sentences
    #[serde(default = "default_true")]
    pub normalize_answers: bool,

    /// Try dash, question-pattern and title parsing before giving up
    #[serde(default = "default_true")]
    pub title_fallback: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            knowledge_path: None,
            normalize_answers: default_true(),
            title_fallback: default_true(),
        }
    }
}

impl ResolverConfig {
    /// Load from the default path, falling back to defaults.
    pub fn load_or_default() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("Invalid config at {}, using defaults: {}", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert!(config.normalize_answers);
        assert!(config.title_fallback);
        assert!(config.knowledge_path.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ResolverConfig::from_toml_str("title_fallback = false").unwrap();
        assert!(!config.title_fallback);
        assert!(config.normalize_answers);

        let config = ResolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "normalize_answers = false").unwrap();
        writeln!(file, "knowledge_path = \"/tmp/tables.toml\"").unwrap();

        let config = ResolverConfig::load(file.path()).unwrap();
        assert!(!config.normalize_answers);
        assert_eq!(config.knowledge_path, Some(PathBuf::from("/tmp/tables.toml")));
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(ResolverConfig::from_toml_str("normalize_answers = \"often\"").is_err());
        assert!(ResolverConfig::load("/nonexistent/slideqa.toml").is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let text = ResolverConfig::default().to_toml_string().unwrap();
        assert!(text.contains("normalize_answers = true"));
    }
}
