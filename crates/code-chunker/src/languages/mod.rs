//! Built-in language plugins

pub mod python;
pub mod rust;
pub mod sindarin;

use crate::language::Language;
use crate::registry::LanguagePlugin;

pub use python::PythonExtractor;
pub use rust::RustExtractor;

/// Plugin for a built-in language
#[must_use]
pub fn builtin_plugin(language: Language) -> Option<LanguagePlugin> {
    match language {
        Language::Sindarin => Some(sindarin::plugin()),
        Language::Rust => Some(rust::plugin()),
        Language::Python => Some(python::plugin()),
        Language::Unknown => None,
    }
}
