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

pub static PROFILE: ExtractionProfile = ExtractionProfile {
    splittable: SplittableKindSet::from_static(&[
        "function_definition",
        "class_definition",
        "decorated_definition",
    ]),
    declarations: &[
        ("function_definition", DeclarationKind::Function),
        ("class_definition", DeclarationKind::Aggregate),
    ],
    members: &[
        ("expression_statement", MemberKind::Field),
        ("function_definition", MemberKind::Method),
        ("decorated_definition", MemberKind::Method),
    ],
    parameter_kinds: &[
        "identifier",
        "typed_parameter",
        "default_parameter",
        "typed_default_parameter",
        "list_splat_pattern",
        "dictionary_splat_pattern",
    ],
    parameter_name: Field::Name,
    visibility: VisibilitySource::None,
    decorator_kind: Some("decorator"),
};

const STATIC_DECORATOR: &str = "@staticmethod";

/// Python metadata. Decorated definitions are described by their inner
/// definition plus the decorator list of the wrapper.
#[derive(Debug, Clone, Copy)]
pub struct PythonExtractor {
    base: ProfileExtractor,
}

impl PythonExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: ProfileExtractor::new(&PROFILE),
        }
    }

    fn parameters(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        let profile = self.base.profile();
        let Some(params) = node.field(Field::Parameters) else {
            return Vec::new();
        };

        params
            .children()
            .filter(|param| profile.parameter_kinds.contains(&param.kind()))
            .filter_map(|param| param.field(profile.parameter_name).or_else(|| Self::bare_name(param)))
            .map(|name| name.utf8_text(source).into_owned())
            .collect()
    }

    /// Name of a parameter without a `name` field: plain and splat parameters
    /// are their own name, `typed_parameter` leads with it
    fn bare_name(param: Node<'_>) -> Option<Node<'_>> {
        if param.kind() == "typed_parameter" {
            param.children().find(|child| child.is_named())
        } else {
            Some(param)
        }
    }

    fn class_members(&self, class: Node<'_>, source: &[u8]) -> MemberLists {
        let mut lists = MemberLists::default();
        let Some(body) = class.field(Field::Body) else {
            return lists;
        };

        for child in body.children() {
            match self.base.profile().member_kind(child.kind()) {
                Some(MemberKind::Field) => {
                    for assignment in child.children().filter(|n| n.kind() == "assignment") {
                        match assignment.field(Field::Left) {
                            Some(target) if target.kind() == "identifier" => {
                                lists.push(MemberKind::Field, target.utf8_text(source).into_owned());
                            }
                            _ => log::debug!(
                                "class attribute at {} has no plain name",
                                assignment.start_byte()
                            ),
                        }
                    }
                }
                Some(kind) => {
                    if let Some((kind, name)) = self.method(child, kind, source) {
                        lists.push(kind, name.utf8_text(source).into_owned());
                    }
                }
                None => {}
            }
        }
        lists
    }

    /// Name of a method member, promoted to a static method by `@staticmethod`.
    /// Decorated classes nested in the body are not members.
    fn method<'t>(
        &self,
        member: Node<'t>,
        kind: MemberKind,
        source: &[u8],
    ) -> Option<(MemberKind, Node<'t>)> {
        let Some(definition) = member.field(Field::Definition) else {
            return member.field(Field::Name).map(|name| (kind, name));
        };
        if self.base.profile().declaration_kind(definition.kind()) != DeclarationKind::Function {
            return None;
        }
        let is_static = self
            .base
            .decorators(member, source)
            .iter()
            .any(|decorator| decorator == STATIC_DECORATOR);
        let kind = if is_static { MemberKind::StaticMethod } else { kind };
        definition.field(Field::Name).map(|name| (kind, name))
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor for PythonExtractor {
    fn extract(&self, node: Node<'_>, source: &[u8]) -> ChunkMetadata {
        let mut metadata = ChunkMetadata::for_node_type(node.kind());

        let definition = if node.kind() == "decorated_definition" {
            match node.field(Field::Definition) {
                Some(definition) => {
                    metadata.set_text(keys::DEFINITION_TYPE, definition.kind());
                    definition
                }
                None => {
                    log::debug!("decorated definition at {} without a target", node.start_byte());
                    node
                }
            }
        } else {
            node
        };

        self.base.signature(definition, source, &mut metadata);
        metadata.set_parameters(self.parameters(definition, source));

        match PROFILE.declaration_kind(definition.kind()) {
            DeclarationKind::Function => {
                if definition.child_of_kind("async").is_some() {
                    metadata.set_flag(keys::IS_ASYNC, true);
                }
            }
            kind if kind.has_members() => {
                self.class_members(definition, source).apply(&mut metadata);
            }
            _ => {}
        }

        metadata.set_list(keys::DECORATORS, self.base.decorators(node, source));
        metadata
    }
}

impl NodeClassifier for PythonExtractor {
    fn splittable_kinds(&self) -> &SplittableKindSet {
        self.base.splittable_kinds()
    }
}

#[must_use]
pub fn plugin() -> LanguagePlugin {
    let extractor = Arc::new(PythonExtractor::new());
    LanguagePlugin::new(extractor.clone(), extractor)
        .with_provider(Arc::new(TreeSitterProvider::new(tree_sitter_python::LANGUAGE.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TreeBuilder;

    // `class C:\n  @staticmethod\n  def make(): ...\n  x = 1`
    #[test]
    fn member_table_drives_class_members() {
        let source = b"class C:\n  @staticmethod\n  def make(): ...\n  x = 1";
        let mut b = TreeBuilder::new();
        let root = b.node("module", 0..50);
        let class = b.node("class_definition", 0..50);
        let class_name = b.node("identifier", 6..7);
        let body = b.node("block", 11..50);
        let decorated = b.node("decorated_definition", 11..42);
        let decorator = b.node("decorator", 11..24);
        let def = b.node("function_definition", 27..42);
        let def_name = b.node("identifier", 31..35);
        let statement = b.node("expression_statement", 45..50);
        let assignment = b.node("assignment", 45..50);
        let target = b.node("identifier", 45..46);
        b.append_field(def, Field::Name, def_name);
        b.append(decorated, decorator)
            .append_field(decorated, Field::Definition, def);
        b.append_field(assignment, Field::Left, target);
        b.append(statement, assignment);
        b.append(body, decorated).append(body, statement);
        b.append_field(class, Field::Name, class_name)
            .append_field(class, Field::Body, body);
        b.append(root, class);
        let tree = b.build(root).unwrap();

        let class = tree.root().children().next().unwrap();
        let metadata = PythonExtractor::new().extract(class, source);
        assert_eq!(metadata.text(keys::NAME), Some("C"));
        assert_eq!(metadata.text_list(keys::STATIC_METHODS), Some(&["make".to_string()][..]));
        assert_eq!(metadata.text_list(keys::FIELDS), Some(&["x".to_string()][..]));
        assert!(!metadata.contains_key(keys::METHODS));
    }

    #[test]
    fn parameter_table_lists_every_named_shape() {
        for kind in ["identifier", "typed_parameter", "list_splat_pattern", "dictionary_splat_pattern"] {
            assert!(PROFILE.parameter_kinds.contains(&kind), "{kind}");
        }
        assert!(!PROFILE.parameter_kinds.contains(&"keyword_separator"));
    }
}
