use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default upper bound on input size (4 MiB)
pub const DEFAULT_MAX_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Configuration for code chunking behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Reject sources larger than this many bytes (0 = unlimited)
    pub max_file_bytes: usize,

    /// Languages to accept (empty = every registered language)
    pub supported_languages: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            supported_languages: vec![],
        }
    }
}

impl ChunkerConfig {
    /// Create config without an input size limit
    pub fn unlimited() -> Self {
        Self {
            max_file_bytes: 0,
            ..Default::default()
        }
    }

    /// Create config that only accepts the given languages
    pub fn for_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported_languages: languages.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ChunkerError::invalid_config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(blank) = self
            .supported_languages
            .iter()
            .position(|lang| lang.trim().is_empty())
        {
            return Err(ChunkerError::invalid_config(format!(
                "supported_languages[{blank}] is blank"
            )));
        }
        Ok(())
    }

    /// Whether the language passes the `supported_languages` filter
    pub fn allows_language(&self, language: &str) -> bool {
        self.supported_languages.is_empty()
            || self.supported_languages.iter().any(|lang| lang == language)
    }

    /// Enforce `max_file_bytes`
    pub fn check_size(&self, size: usize) -> Result<()> {
        if self.max_file_bytes > 0 && size > self.max_file_bytes {
            return Err(ChunkerError::FileTooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(())
    }
}
