//! Outline-based tree construction for tests.
//!
//! Each outline node names its kind and the exact text it covers; byte ranges
//! are found by searching the source left to right inside the parent's span.

#![allow(dead_code)]

use semchunk_code_chunker::{Field, NodeId, SyntaxProvider, SyntaxTree, TreeBuilder};

pub struct Outline {
    kind: &'static str,
    text: &'static str,
    named: bool,
    error: bool,
    field: Option<Field>,
    children: Vec<Outline>,
}

/// Named node covering `text`
pub fn node(kind: &'static str, text: &'static str) -> Outline {
    Outline {
        kind,
        text,
        named: true,
        error: false,
        field: None,
        children: Vec::new(),
    }
}

/// Anonymous token whose kind is its text
pub fn token(text: &'static str) -> Outline {
    Outline {
        named: false,
        ..node(text, text)
    }
}

impl Outline {
    pub fn field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with(mut self, children: impl IntoIterator<Item = Outline>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn error(mut self) -> Self {
        self.error = true;
        self
    }
}

/// Build a tree whose root spans the whole source
pub fn tree(source: &str, root_kind: &'static str, children: Vec<Outline>) -> SyntaxTree {
    let mut builder = TreeBuilder::new();
    let root = builder.node(root_kind, 0..source.len());
    let mut cursor = 0;
    for child in &children {
        let id = place(&mut builder, source, child, &mut cursor, source.len());
        attach(&mut builder, root, child.field, id);
    }
    builder
        .build(root)
        .expect("outline must describe a well-formed tree")
}

fn place(
    builder: &mut TreeBuilder,
    source: &str,
    outline: &Outline,
    cursor: &mut usize,
    limit: usize,
) -> NodeId {
    let offset = source[*cursor..limit]
        .find(outline.text)
        .unwrap_or_else(|| panic!("`{}` not found after byte {}", outline.text, cursor));
    let start = *cursor + offset;
    let end = start + outline.text.len();

    let id = if outline.named {
        builder.node(outline.kind, start..end)
    } else {
        builder.token(outline.kind, start..end)
    };
    if outline.error {
        builder.mark_error(id);
    }

    let mut inner = start;
    for child in &outline.children {
        let child_id = place(builder, source, child, &mut inner, end);
        attach(builder, id, child.field, child_id);
    }

    *cursor = end;
    id
}

fn attach(builder: &mut TreeBuilder, parent: NodeId, field: Option<Field>, child: NodeId) {
    match field {
        Some(field) => builder.append_field(parent, field, child),
        None => builder.append(parent, child),
    };
}

/// Provider that always returns the same prepared tree
pub struct FixedTree(pub SyntaxTree);

impl SyntaxProvider for FixedTree {
    fn parse(&self, _source: &[u8]) -> semchunk_code_chunker::Result<SyntaxTree> {
        Ok(self.0.clone())
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
