//! Owned concrete syntax tree consumed by the chunking engine.
//!
//! Parsers hand the engine a [`SyntaxTree`]: an arena of nodes carrying a kind
//! label, a byte range into the original source, an ordered child list and a
//! small table of named fields. Tree-sitter trees are lowered into this shape
//! by [`crate::TreeSitterProvider`]; other parsers (and tests) use
//! [`TreeBuilder`].

use crate::error::{ChunkerError, Result};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Named child fields the extractors know how to read.
///
/// Provider field labels outside this set are not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Body,
    Parameters,
    ReturnType,
    Modifier,
    Type,
    Pattern,
    Definition,
    Trait,
    TypeParameters,
    Value,
    Left,
    Right,
}

impl Field {
    /// Map a provider field label to a field
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "name" => Self::Name,
            "body" => Self::Body,
            "parameters" => Self::Parameters,
            "return_type" => Self::ReturnType,
            "modifier" => Self::Modifier,
            "type" => Self::Type,
            "pattern" => Self::Pattern,
            "definition" => Self::Definition,
            "trait" => Self::Trait,
            "type_parameters" => Self::TypeParameters,
            "value" => Self::Value,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => return None,
        };
        Some(field)
    }

    /// Get field label as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Body => "body",
            Self::Parameters => "parameters",
            Self::ReturnType => "return_type",
            Self::Modifier => "modifier",
            Self::Type => "type",
            Self::Pattern => "pattern",
            Self::Definition => "definition",
            Self::Trait => "trait",
            Self::TypeParameters => "type_parameters",
            Self::Value => "value",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Index of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: Cow<'static, str>,
    range: Range<usize>,
    named: bool,
    error: bool,
    children: Vec<NodeId>,
    fields: Vec<(Field, NodeId)>,
}

/// A parsed file. Read-only once built.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    has_error: bool,
}

impl SyntaxTree {
    /// Root node (the whole file)
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    /// Handle for a node id produced while building this tree
    #[must_use]
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// Whether any node is an error or missing node
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.has_error
    }

    /// Number of nodes in the arena
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Borrowed handle to one node of a [`SyntaxTree`]
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Kind label assigned by the grammar
    #[must_use]
    pub fn kind(&self) -> &'t str {
        &self.data().kind
    }

    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.data().range.clone()
    }

    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.data().range.start
    }

    #[must_use]
    pub fn end_byte(&self) -> usize {
        self.data().range.end
    }

    /// Named nodes are grammar rules; anonymous nodes are literal tokens
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.data().named
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.data().error
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Children in source order
    pub fn children(
        &self,
    ) -> impl DoubleEndedIterator<Item = Node<'t>> + ExactSizeIterator + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Child stored under a named field
    #[must_use]
    pub fn field(&self, field: Field) -> Option<Node<'t>> {
        self.data()
            .fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, id)| self.tree.node(id))
    }

    /// First immediate child with the given kind
    #[must_use]
    pub fn child_of_kind(&self, kind: &str) -> Option<Node<'t>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Byte-exact slice of the source covered by this node
    #[must_use]
    pub fn text<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        source.get(self.byte_range()).unwrap_or_default()
    }

    /// Source text of this node; borrowed unless the bytes are not valid UTF-8.
    /// The chunker only calls this on sources it has validated as UTF-8.
    #[must_use]
    pub fn utf8_text<'s>(&self, source: &'s [u8]) -> Cow<'s, str> {
        String::from_utf8_lossy(self.text(source))
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.byte_range();
        write!(f, "{} [{}..{}]", self.kind(), range.start, range.end)
    }
}

/// Incremental builder for a [`SyntaxTree`].
///
/// Nodes are created first and attached afterwards; children must be
/// appended in source order. [`TreeBuilder::build`] checks the tree shape.
/// Ids minted by another builder are recorded and fail the build.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    foreign: bool,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            foreign: false,
        }
    }

    /// Create a named node
    pub fn node(&mut self, kind: impl Into<Cow<'static, str>>, range: Range<usize>) -> NodeId {
        self.push(kind.into(), range, true)
    }

    /// Create an anonymous token node (punctuation, keywords)
    pub fn token(&mut self, kind: impl Into<Cow<'static, str>>, range: Range<usize>) -> NodeId {
        self.push(kind.into(), range, false)
    }

    fn push(&mut self, kind: Cow<'static, str>, range: Range<usize>, named: bool) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(NodeData {
            kind,
            range,
            named,
            error: false,
            children: Vec::new(),
            fields: Vec::new(),
        });
        id
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        let data = self.nodes.get_mut(id.index());
        self.foreign |= data.is_none();
        data
    }

    /// Append an unlabelled child
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> &mut Self {
        if let Some(data) = self.data_mut(parent) {
            data.children.push(child);
        }
        self
    }

    /// Append a child and record it under `field`
    pub fn append_field(&mut self, parent: NodeId, field: Field, child: NodeId) -> &mut Self {
        if let Some(data) = self.data_mut(parent) {
            data.children.push(child);
            data.fields.push((field, child));
        }
        self
    }

    /// Flag a node as an error (or missing) node
    pub fn mark_error(&mut self, id: NodeId) -> &mut Self {
        if let Some(data) = self.data_mut(id) {
            data.error = true;
        }
        self
    }

    /// Finish the tree rooted at `root`.
    ///
    /// Fails with `InvalidBoundaries` when a child escapes its parent's range
    /// or overlaps / precedes its previous sibling, and with `ParseError` when a
    /// node has more than one parent, the root is attached somewhere, or a
    /// node id came from another builder.
    pub fn build(self, root: NodeId) -> Result<SyntaxTree> {
        if root.index() >= self.nodes.len() || self.nodes.len() > u32::MAX as usize {
            return Err(ChunkerError::parse("root node does not belong to this builder"));
        }
        if self.foreign {
            return Err(ChunkerError::parse("parent node does not belong to this builder"));
        }

        let mut parent_count = vec![0u8; self.nodes.len()];
        for node in &self.nodes {
            let Range { start, end } = node.range;
            if start > end {
                return Err(ChunkerError::InvalidBoundaries { start, end });
            }

            let mut cursor = start;
            for &child in &node.children {
                let Some(child_data) = self.nodes.get(child.index()) else {
                    return Err(ChunkerError::parse(
                        "child node does not belong to this builder",
                    ));
                };
                let range = &child_data.range;
                if range.start < cursor || range.end > end {
                    return Err(ChunkerError::InvalidBoundaries {
                        start: range.start,
                        end: range.end,
                    });
                }
                cursor = range.end;

                let count = &mut parent_count[child.index()];
                *count = count.saturating_add(1);
                if *count > 1 {
                    return Err(ChunkerError::parse(format!(
                        "node `{}` attached to more than one parent",
                        child_data.kind
                    )));
                }
            }
        }

        if parent_count[root.index()] != 0 {
            return Err(ChunkerError::parse("root node has a parent"));
        }

        let has_error = self.nodes.iter().any(|node| node.error);
        Ok(SyntaxTree {
            nodes: self.nodes,
            root,
            has_error,
        })
    }
}
