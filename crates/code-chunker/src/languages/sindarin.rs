//! Sindarin: a systems language with `native fn` C interop, struct-based OOP
//! with instance and static methods, and `=>` block syntax.
//!
//! No grammar ships with this crate; callers bring their own
//! [`crate::SyntaxProvider`] or hand the chunker a prepared tree.

use crate::classifier::SplittableKindSet;
use crate::extractor::{DeclarationKind, ExtractionProfile, MemberKind, ProfileExtractor, VisibilitySource};
use crate::registry::LanguagePlugin;
use crate::syntax::Field;
use std::sync::Arc;

pub static PROFILE: ExtractionProfile = ExtractionProfile {
    splittable: SplittableKindSet::from_static(&[
        "function_declaration",
        "native_function_declaration",
        "static_function_declaration",
        "struct_declaration",
        "type_declaration",
    ]),
    declarations: &[
        ("function_declaration", DeclarationKind::Function),
        ("native_function_declaration", DeclarationKind::Native),
        ("static_function_declaration", DeclarationKind::Static),
        ("struct_declaration", DeclarationKind::Aggregate),
        ("type_declaration", DeclarationKind::TypeAlias),
    ],
    members: &[
        ("field_declaration", MemberKind::Field),
        ("function_declaration", MemberKind::Method),
        ("static_function_declaration", MemberKind::StaticMethod),
    ],
    parameter_kinds: &["parameter"],
    parameter_name: Field::Name,
    visibility: VisibilitySource::Field(Field::Modifier),
    decorator_kind: Some("decorator"),
};

#[must_use]
pub const fn extractor() -> ProfileExtractor {
    ProfileExtractor::new(&PROFILE)
}

#[must_use]
pub fn plugin() -> LanguagePlugin {
    let extractor = Arc::new(extractor());
    LanguagePlugin::new(extractor.clone(), extractor)
}
