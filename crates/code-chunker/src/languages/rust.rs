use crate::classifier::{NodeClassifier, SplittableKindSet};
use crate::extractor::{
    DeclarationKind, ExtractionProfile, MemberKind, MemberLists, MetadataExtractor,
    ProfileExtractor, VisibilitySource,
};
use crate::provider::TreeSitterProvider;
use crate::registry::LanguagePlugin;
use crate::syntax::{Field, Node};
use crate::types::{keys, ChunkMetadata};
use std::sync::Arc;

// `mod_item` is not splittable: items inside a module chunk individually.
pub static PROFILE: ExtractionProfile = ExtractionProfile {
    splittable: SplittableKindSet::from_static(&[
        "function_item",
        "struct_item",
        "enum_item",
        "union_item",
        "trait_item",
        "impl_item",
        "type_item",
        "const_item",
        "static_item",
        "foreign_mod_item",
        "macro_definition",
    ]),
    declarations: &[
        ("function_item", DeclarationKind::Function),
        ("struct_item", DeclarationKind::Aggregate),
        ("union_item", DeclarationKind::Aggregate),
        ("enum_item", DeclarationKind::Enumeration),
        ("impl_item", DeclarationKind::Implementation),
        ("trait_item", DeclarationKind::Interface),
        ("type_item", DeclarationKind::TypeAlias),
        ("static_item", DeclarationKind::Static),
        ("foreign_mod_item", DeclarationKind::Native),
    ],
    members: &[("field_declaration", MemberKind::Field)],
    parameter_kinds: &["parameter"],
    parameter_name: Field::Pattern,
    visibility: VisibilitySource::ChildKind("visibility_modifier"),
    decorator_kind: None,
};

/// Rust metadata: the profile steps plus impl/trait method split, enum
/// variants and `async` detection
#[derive(Debug, Clone, Copy)]
pub struct RustExtractor {
    base: ProfileExtractor,
}

impl RustExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: ProfileExtractor::new(&PROFILE),
        }
    }

    /// Functions taking `self` are methods, the rest are associated functions
    fn associated_functions(node: Node<'_>, source: &[u8]) -> MemberLists {
        let mut lists = MemberLists::default();
        let Some(body) = node.field(Field::Body) else {
            return lists;
        };

        for item in body.children() {
            if !matches!(item.kind(), "function_item" | "function_signature_item") {
                continue;
            }
            let Some(name) = item.field(Field::Name) else {
                log::debug!("{} at {}: function without a name", item.kind(), item.start_byte());
                continue;
            };
            let takes_self = item
                .field(Field::Parameters)
                .and_then(|params| params.child_of_kind("self_parameter"))
                .is_some();
            let kind = if takes_self {
                MemberKind::Method
            } else {
                MemberKind::StaticMethod
            };
            lists.push(kind, name.utf8_text(source).into_owned());
        }
        lists
    }

    fn variants(node: Node<'_>, source: &[u8]) -> Vec<String> {
        node.field(Field::Body)
            .into_iter()
            .flat_map(|body| body.children())
            .filter(|child| child.kind() == "enum_variant")
            .filter_map(|variant| variant.field(Field::Name))
            .map(|name| name.utf8_text(source).into_owned())
            .collect()
    }

    fn is_async(node: Node<'_>) -> bool {
        node.child_of_kind("function_modifiers")
            .is_some_and(|modifiers| modifiers.child_of_kind("async").is_some())
    }
}

impl Default for RustExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor for RustExtractor {
    fn extract(&self, node: Node<'_>, source: &[u8]) -> ChunkMetadata {
        let mut metadata = self.base.extract(node, source);

        match PROFILE.declaration_kind(node.kind()) {
            DeclarationKind::Function => {
                if Self::is_async(node) {
                    metadata.set_flag(keys::IS_ASYNC, true);
                }
            }
            DeclarationKind::Implementation => {
                if let Some(target) = node.field(Field::Type) {
                    metadata.set_text(keys::NAME, target.utf8_text(source));
                }
                if let Some(trait_name) = node.field(Field::Trait) {
                    metadata.set_text(keys::TRAIT, trait_name.utf8_text(source));
                }
                Self::associated_functions(node, source).apply(&mut metadata);
            }
            DeclarationKind::Interface => {
                Self::associated_functions(node, source).apply(&mut metadata);
            }
            DeclarationKind::Enumeration => {
                metadata.set_list(keys::VARIANTS, Self::variants(node, source));
            }
            _ => {}
        }

        metadata
    }
}

impl NodeClassifier for RustExtractor {
    fn splittable_kinds(&self) -> &SplittableKindSet {
        self.base.splittable_kinds()
    }
}

#[must_use]
pub fn plugin() -> LanguagePlugin {
    let extractor = Arc::new(RustExtractor::new());
    LanguagePlugin::new(extractor.clone(), extractor)
        .with_provider(Arc::new(TreeSitterProvider::new(tree_sitter_rust::LANGUAGE.into())))
}
