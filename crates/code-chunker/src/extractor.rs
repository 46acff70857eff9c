//! Metadata extraction for splittable nodes.
//!
//! Most languages are described by a static [`ExtractionProfile`] table and
//! handled by [`ProfileExtractor`]. Languages whose trees need extra rules wrap
//! a `ProfileExtractor` and reuse its individual steps.

use crate::classifier::{NodeClassifier, SplittableKindSet};
use crate::syntax::{Field, Node};
use crate::types::{keys, ChunkMetadata};

/// Produces the metadata record for a splittable node
pub trait MetadataExtractor: Send + Sync {
    /// `node` must be splittable for the extractor's language
    fn extract(&self, node: Node<'_>, source: &[u8]) -> ChunkMetadata;
}

/// Declaration category of a splittable kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Function,
    /// Foreign-interop declaration
    Native,
    Static,
    /// Struct-like declaration whose body holds members
    Aggregate,
    TypeAlias,
    /// Implementation block attaching functions to a type
    Implementation,
    /// Trait or interface declaring functions
    Interface,
    Enumeration,
    Other,
}

impl DeclarationKind {
    /// Boolean metadata key implied by the kind
    #[must_use]
    pub const fn flag_key(self) -> Option<&'static str> {
        match self {
            Self::Native => Some(keys::IS_NATIVE),
            Self::Static => Some(keys::IS_STATIC),
            _ => None,
        }
    }

    #[must_use]
    pub const fn has_members(self) -> bool {
        matches!(self, Self::Aggregate)
    }
}

/// Category of a declaration inside an aggregate body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    StaticMethod,
}

impl MemberKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Field => keys::FIELDS,
            Self::Method => keys::METHODS,
            Self::StaticMethod => keys::STATIC_METHODS,
        }
    }
}

/// Where a declaration's visibility modifier lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilitySource {
    Field(Field),
    ChildKind(&'static str),
    None,
}

/// Static description of one language's tree shapes
#[derive(Debug)]
pub struct ExtractionProfile {
    pub splittable: SplittableKindSet,
    pub declarations: &'static [(&'static str, DeclarationKind)],
    pub members: &'static [(&'static str, MemberKind)],
    pub parameter_kinds: &'static [&'static str],
    /// Field of a parameter node holding its name
    pub parameter_name: Field,
    pub visibility: VisibilitySource,
    pub decorator_kind: Option<&'static str>,
}

impl ExtractionProfile {
    /// Declaration category for a kind; unlisted kinds are `Other`
    #[must_use]
    pub fn declaration_kind(&self, kind: &str) -> DeclarationKind {
        self.declarations
            .iter()
            .find(|(label, _)| *label == kind)
            .map_or(DeclarationKind::Other, |&(_, decl)| decl)
    }

    #[must_use]
    pub fn member_kind(&self, kind: &str) -> Option<MemberKind> {
        self.members
            .iter()
            .find(|(label, _)| *label == kind)
            .map(|&(_, member)| member)
    }
}

/// Members of an aggregate body, in source order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemberLists {
    pub fields: Vec<String>,
    pub methods: Vec<String>,
    pub static_methods: Vec<String>,
}

impl MemberLists {
    pub fn push(&mut self, kind: MemberKind, name: String) {
        match kind {
            MemberKind::Field => self.fields.push(name),
            MemberKind::Method => self.methods.push(name),
            MemberKind::StaticMethod => self.static_methods.push(name),
        }
    }

    /// Attach the non-empty lists
    pub fn apply(self, metadata: &mut ChunkMetadata) {
        metadata.set_list(keys::FIELDS, self.fields);
        metadata.set_list(keys::METHODS, self.methods);
        metadata.set_list(keys::STATIC_METHODS, self.static_methods);
    }
}

/// Extractor and classifier driven entirely by an [`ExtractionProfile`]
#[derive(Debug, Clone, Copy)]
pub struct ProfileExtractor {
    profile: &'static ExtractionProfile,
}

impl ProfileExtractor {
    #[must_use]
    pub const fn new(profile: &'static ExtractionProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub const fn profile(&self) -> &'static ExtractionProfile {
        self.profile
    }

    /// `name`, `return_type` and `visibility`
    pub fn signature(&self, node: Node<'_>, source: &[u8], metadata: &mut ChunkMetadata) {
        if let Some(name) = node.field(Field::Name) {
            metadata.set_text(keys::NAME, name.utf8_text(source));
        }
        if let Some(return_type) = node.field(Field::ReturnType) {
            metadata.set_text(keys::RETURN_TYPE, return_type.utf8_text(source));
        }
        if let Some(visibility) = self.visibility(node) {
            metadata.set_text(keys::VISIBILITY, visibility.utf8_text(source));
        }
    }

    fn visibility<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        match self.profile.visibility {
            VisibilitySource::Field(field) => node.field(field),
            VisibilitySource::ChildKind(kind) => node.child_of_kind(kind),
            VisibilitySource::None => None,
        }
    }

    /// Names of the parameters listed under the node's `parameters` field
    #[must_use]
    pub fn parameters(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        let Some(params) = node.field(Field::Parameters) else {
            return Vec::new();
        };

        let names: Vec<String> = params
            .children()
            .filter(|child| self.profile.parameter_kinds.contains(&child.kind()))
            .filter_map(|param| param.field(self.profile.parameter_name))
            .map(|name| name.utf8_text(source).into_owned())
            .collect();

        if names.is_empty() && params.children().any(|child| child.is_named()) {
            log::debug!(
                "{} at {}: parameter list without named parameters",
                node.kind(),
                node.start_byte()
            );
        }
        names
    }

    /// `is_native` / `is_static` implied by the node kind
    pub fn declaration_flags(&self, kind: &str, metadata: &mut ChunkMetadata) {
        if let Some(key) = self.profile.declaration_kind(kind).flag_key() {
            metadata.set_flag(key, true);
        }
    }

    /// One pass over the immediate children of the node's body
    #[must_use]
    pub fn members(&self, node: Node<'_>, source: &[u8]) -> MemberLists {
        let mut lists = MemberLists::default();
        let Some(body) = node.field(Field::Body) else {
            return lists;
        };

        for child in body.children() {
            let Some(member) = self.profile.member_kind(child.kind()) else {
                continue;
            };
            match child.field(Field::Name) {
                Some(name) => lists.push(member, name.utf8_text(source).into_owned()),
                None => log::debug!(
                    "{} at {}: member without a name",
                    child.kind(),
                    child.start_byte()
                ),
            }
        }
        lists
    }

    /// Full text of decorator children, in encounter order
    #[must_use]
    pub fn decorators(&self, node: Node<'_>, source: &[u8]) -> Vec<String> {
        let Some(decorator_kind) = self.profile.decorator_kind else {
            return Vec::new();
        };
        node.children()
            .filter(|child| child.kind() == decorator_kind)
            .map(|child| child.utf8_text(source).into_owned())
            .collect()
    }
}

impl MetadataExtractor for ProfileExtractor {
    fn extract(&self, node: Node<'_>, source: &[u8]) -> ChunkMetadata {
        let mut metadata = ChunkMetadata::for_node_type(node.kind());

        self.signature(node, source, &mut metadata);
        metadata.set_parameters(self.parameters(node, source));
        self.declaration_flags(node.kind(), &mut metadata);

        if self.profile.declaration_kind(node.kind()).has_members() {
            self.members(node, source).apply(&mut metadata);
        }

        metadata.set_list(keys::DECORATORS, self.decorators(node, source));
        metadata
    }
}

impl NodeClassifier for ProfileExtractor {
    fn splittable_kinds(&self) -> &SplittableKindSet {
        &self.profile.splittable
    }
}
