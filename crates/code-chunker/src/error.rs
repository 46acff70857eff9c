use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during code chunking
///
/// Metadata extraction never produces one of these: a malformed or missing
/// field only drops the optional metadata entry and is logged.
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Language identifier is not registered
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Failed to parse the source code, or the tree contains error nodes
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Language is registered but has no bundled syntax provider
    #[error("No syntax provider registered for language: {0}")]
    NoSyntaxProvider(String),

    /// A language id was registered twice
    #[error("Language already registered: {0}")]
    DuplicateLanguage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Node byte range breaks the containment/ordering invariant
    #[error("Invalid chunk boundaries: start={start}, end={end}")]
    InvalidBoundaries { start: usize, end: usize },

    /// Input exceeds `max_file_bytes`
    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ChunkerError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unknown language error
    pub fn unknown_language(lang: impl Into<String>) -> Self {
        Self::UnknownLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Whether the error concerns the input itself rather than the caller's setup
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ParseError(_) | Self::InvalidBoundaries { .. } | Self::FileTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ChunkerError::unknown_language("cobol").to_string(),
            "Unknown language: cobol"
        );
        assert_eq!(
            ChunkerError::InvalidBoundaries { start: 4, end: 2 }.to_string(),
            "Invalid chunk boundaries: start=4, end=2"
        );
    }

    #[test]
    fn input_errors_are_distinguished_from_setup_errors() {
        assert!(ChunkerError::parse("bad").is_input_error());
        assert!(ChunkerError::FileTooLarge { size: 10, limit: 5 }.is_input_error());
        assert!(!ChunkerError::unknown_language("x").is_input_error());
        assert!(!ChunkerError::NoSyntaxProvider("sindarin".into()).is_input_error());
    }
}
