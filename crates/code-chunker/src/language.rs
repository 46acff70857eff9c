use crate::error::{ChunkerError, Result};
use std::path::Path;

/// Built-in language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Sindarin,
    Rust,
    Python,
    Unknown,
}

impl Language {
    /// Every built-in language with a registered plugin
    pub const BUILTIN: [Language; 3] = [Language::Sindarin, Language::Rust, Language::Python];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "sn" => Language::Sindarin,
            "rs" => Language::Rust,
            "py" | "pyw" | "pyi" => Language::Python,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Registry id of the language
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Sindarin => "sindarin",
            Language::Rust => "rust",
            Language::Python => "python",
            Language::Unknown => "unknown",
        }
    }

    /// Whether a tree-sitter grammar ships with this crate
    pub fn has_bundled_grammar(self) -> bool {
        matches!(self, Language::Rust | Language::Python)
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Rust => Ok(tree_sitter_rust::LANGUAGE.into()),
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::Sindarin => Err(ChunkerError::NoSyntaxProvider(self.as_str().to_string())),
            Language::Unknown => Err(ChunkerError::unknown_language(self.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("sn"), Language::Sindarin);
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("pyi"), Language::Python);
        assert_eq!(Language::from_extension("unknown"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("lib/strings.sn"), Language::Sindarin);
        assert_eq!(Language::from_path("test.rs"), Language::Rust);
        assert_eq!(Language::from_path("src/main.py"), Language::Python);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
    }

    #[test]
    fn test_tree_sitter_language() {
        assert!(Language::Rust.tree_sitter_language().is_ok());
        assert!(Language::Python.tree_sitter_language().is_ok());
        assert!(matches!(
            Language::Sindarin.tree_sitter_language(),
            Err(ChunkerError::NoSyntaxProvider(_))
        ));
        assert!(Language::Unknown.tree_sitter_language().is_err());
    }

    #[test]
    fn bundled_grammars() {
        let bundled: Vec<_> = Language::BUILTIN
            .into_iter()
            .filter(|lang| lang.has_bundled_grammar())
            .map(Language::as_str)
            .collect();
        assert_eq!(bundled, ["rust", "python"]);
    }
}
