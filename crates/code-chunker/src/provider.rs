use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::syntax::{Field, NodeId, SyntaxTree, TreeBuilder};
use std::fmt;
use tree_sitter::Parser;

/// Turns source bytes into a [`SyntaxTree`].
///
/// Implementations must reject input they cannot parse cleanly instead of
/// returning an error-recovery tree.
pub trait SyntaxProvider: Send + Sync {
    fn parse(&self, source: &[u8]) -> Result<SyntaxTree>;
}

/// Syntax provider backed by a tree-sitter grammar
#[derive(Clone)]
pub struct TreeSitterProvider {
    language: tree_sitter::Language,
}

impl TreeSitterProvider {
    #[must_use]
    pub fn new(language: tree_sitter::Language) -> Self {
        Self { language }
    }

    /// Provider for a built-in language with a bundled grammar
    pub fn for_language(language: Language) -> Result<Self> {
        Ok(Self::new(language.tree_sitter_language()?))
    }
}

impl fmt::Debug for TreeSitterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterProvider")
            .field("abi_version", &self.language.version())
            .finish()
    }
}

impl SyntaxProvider for TreeSitterProvider {
    fn parse(&self, source: &[u8]) -> Result<SyntaxTree> {
        // `Parser` is not `Sync`: one per call.
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ChunkerError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let location = first_error(root).map_or_else(
                || "unknown location".to_string(),
                |node| {
                    let pos = node.start_position();
                    format!("line {}, column {}", pos.row + 1, pos.column + 1)
                },
            );
            return Err(ChunkerError::parse(format!("syntax error at {location}")));
        }

        lower(&tree)
    }
}

/// Outermost error or missing node, following the `has_error` trail
fn first_error(root: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    let mut node = root;
    'descend: loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() {
                node = child;
                continue 'descend;
            }
        }
        return None;
    }
}

/// Copy a tree-sitter tree into an owned [`SyntaxTree`] (iterative pre-order walk)
fn lower(tree: &tree_sitter::Tree) -> Result<SyntaxTree> {
    let mut builder = TreeBuilder::with_capacity(tree.root_node().descendant_count());
    let mut cursor = tree.walk();

    let root = lower_node(&mut builder, cursor.node());
    let mut parents: Vec<NodeId> = vec![root];

    if cursor.goto_first_child() {
        'walk: loop {
            let Some(&parent) = parents.last() else {
                break;
            };
            let id = lower_node(&mut builder, cursor.node());
            match cursor.field_name().and_then(Field::from_name) {
                Some(field) => builder.append_field(parent, field, id),
                None => builder.append(parent, id),
            };

            if cursor.goto_first_child() {
                parents.push(id);
                continue;
            }

            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
                parents.pop();
            }
        }
    }

    builder.build(root)
}

fn lower_node(builder: &mut TreeBuilder, node: tree_sitter::Node<'_>) -> NodeId {
    let id = if node.is_named() {
        builder.node(node.kind(), node.byte_range())
    } else {
        builder.token(node.kind(), node.byte_range())
    };
    if node.is_error() || node.is_missing() {
        builder.mark_error(id);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> TreeSitterProvider {
        TreeSitterProvider::for_language(Language::Python).unwrap()
    }

    #[test]
    fn lowers_fields_and_ranges() {
        let source = b"def greet(name):\n    return name\n";
        let tree = python().parse(source).unwrap();
        let root = tree.root();

        assert_eq!(root.kind(), "module");
        let func = root.children().next().unwrap();
        assert_eq!(func.kind(), "function_definition");
        assert_eq!(func.field(Field::Name).unwrap().utf8_text(source), "greet");
        assert_eq!(
            func.field(Field::Parameters).unwrap().utf8_text(source),
            "(name)"
        );
        assert!(!tree.has_error());
    }

    #[test]
    fn keeps_anonymous_tokens() {
        let source = b"x = 1\n";
        let tree = python().parse(source).unwrap();
        let statement = tree.root().children().next().unwrap();
        let assignment = statement.children().next().unwrap();
        let kinds: Vec<_> = assignment.children().map(|n| (n.kind(), n.is_named())).collect();
        assert_eq!(
            kinds,
            [("identifier", true), ("=", false), ("integer", true)]
        );
    }

    #[test]
    fn rejects_syntax_errors() {
        let err = python().parse(b"def broken(:\n    pass\n").unwrap_err();
        assert!(matches!(err, ChunkerError::ParseError(_)), "{err}");
    }

    #[test]
    fn empty_source_is_an_empty_module() {
        let tree = python().parse(b"").unwrap();
        assert_eq!(tree.root().child_count(), 0);
        assert_eq!(tree.root().byte_range(), 0..0);
    }

    #[test]
    fn sindarin_has_no_bundled_provider() {
        assert!(matches!(
            TreeSitterProvider::for_language(Language::Sindarin),
            Err(ChunkerError::NoSyntaxProvider(_))
        ));
    }
}
