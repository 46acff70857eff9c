use crate::classifier::NodeClassifier;
use crate::error::{ChunkerError, Result};
use crate::extractor::MetadataExtractor;
use crate::language::Language;
use crate::languages;
use crate::provider::SyntaxProvider;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static GLOBAL_REGISTRY: Lazy<Arc<LanguageRegistry>> =
    Lazy::new(|| Arc::new(LanguageRegistry::with_builtin_languages()));

/// Classifier + extractor pair registered under a language id, with an
/// optional parser for the language
#[derive(Clone)]
pub struct LanguagePlugin {
    pub classifier: Arc<dyn NodeClassifier>,
    pub extractor: Arc<dyn MetadataExtractor>,
    pub provider: Option<Arc<dyn SyntaxProvider>>,
}

impl LanguagePlugin {
    #[must_use]
    pub fn new(
        classifier: Arc<dyn NodeClassifier>,
        extractor: Arc<dyn MetadataExtractor>,
    ) -> Self {
        Self {
            classifier,
            extractor,
            provider: None,
        }
    }

    /// Builder: attach a syntax provider
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn SyntaxProvider>) -> Self {
        self.provider = Some(provider);
        self
    }
}

impl fmt::Debug for LanguagePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguagePlugin")
            .field("splittable", self.classifier.splittable_kinds())
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

/// Language id → plugin map.
///
/// Filled once at startup and shared read-only afterwards; ids cannot be
/// re-registered.
#[derive(Debug, Default, Clone)]
pub struct LanguageRegistry {
    plugins: HashMap<String, LanguagePlugin>,
}

impl LanguageRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in language
    #[must_use]
    pub fn with_builtin_languages() -> Self {
        let plugins = Language::BUILTIN
            .into_iter()
            .filter_map(|language| {
                languages::builtin_plugin(language).map(|plugin| (language.as_str().to_string(), plugin))
            })
            .collect();
        Self { plugins }
    }

    /// Process-wide registry of built-in languages
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a classifier/extractor pair without a syntax provider
    pub fn register(
        &mut self,
        language: impl Into<String>,
        classifier: Arc<dyn NodeClassifier>,
        extractor: Arc<dyn MetadataExtractor>,
    ) -> Result<()> {
        self.register_plugin(language, LanguagePlugin::new(classifier, extractor))
    }

    pub fn register_plugin(&mut self, language: impl Into<String>, plugin: LanguagePlugin) -> Result<()> {
        let language = language.into();
        if language.trim().is_empty() {
            return Err(ChunkerError::invalid_config("language id must not be blank"));
        }
        if self.plugins.contains_key(&language) {
            return Err(ChunkerError::DuplicateLanguage(language));
        }
        log::debug!(
            "registered language `{language}` ({} splittable kinds)",
            plugin.classifier.splittable_kinds().len()
        );
        self.plugins.insert(language, plugin);
        Ok(())
    }

    /// Classifier and extractor for a language
    pub fn resolve(
        &self,
        language: &str,
    ) -> Result<(Arc<dyn NodeClassifier>, Arc<dyn MetadataExtractor>)> {
        let plugin = self.plugin(language)?;
        Ok((Arc::clone(&plugin.classifier), Arc::clone(&plugin.extractor)))
    }

    pub fn plugin(&self, language: &str) -> Result<&LanguagePlugin> {
        self.plugins
            .get(language)
            .ok_or_else(|| ChunkerError::unknown_language(language))
    }

    #[must_use]
    pub fn contains(&self, language: &str) -> bool {
        self.plugins.contains_key(language)
    }

    /// Registered ids, sorted
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
