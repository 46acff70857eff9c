use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A chunk of source code cut at a splittable syntax node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Language id the chunk was produced for
    pub language: String,

    /// Kind label of the node this chunk covers
    pub kind: String,

    /// Start byte offset (inclusive)
    pub byte_start: usize,

    /// End byte offset (exclusive)
    pub byte_end: usize,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Byte-exact source text of the span
    pub text: String,

    /// Declaration metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Length of the span in bytes
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk covers a byte offset
    #[must_use]
    pub const fn contains_byte(&self, offset: usize) -> bool {
        offset >= self.byte_start && offset < self.byte_end
    }

    /// Declaration name, if the node had one
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata.text(keys::NAME)
    }
}

/// Well-known metadata keys
pub mod keys {
    pub const NODE_TYPE: &str = "node_type";
    pub const NAME: &str = "name";
    pub const RETURN_TYPE: &str = "return_type";
    pub const PARAMETERS: &str = "parameters";
    pub const PARAM_COUNT: &str = "param_count";
    pub const VISIBILITY: &str = "visibility";
    pub const IS_NATIVE: &str = "is_native";
    pub const IS_STATIC: &str = "is_static";
    pub const FIELDS: &str = "fields";
    pub const METHODS: &str = "methods";
    pub const STATIC_METHODS: &str = "static_methods";
    pub const DECORATORS: &str = "decorators";
    pub const VARIANTS: &str = "variants";
    pub const TRAIT: &str = "trait";
    pub const IS_ASYNC: &str = "is_async";
    pub const DEFINITION_TYPE: &str = "definition_type";
}

/// A single metadata value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    Nested(Vec<ChunkMetadata>),
}

/// Open, string-keyed metadata record for one chunk.
///
/// A missing key means the syntax feature does not apply to the node; lists
/// are never stored empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChunkMetadata {
    entries: BTreeMap<String, MetadataValue>,
}

impl ChunkMetadata {
    /// Create metadata with the required `node_type` entry
    pub fn for_node_type(node_type: impl Into<String>) -> Self {
        let mut metadata = Self::default();
        metadata.set_text(keys::NODE_TYPE, node_type);
        metadata
    }

    #[must_use]
    pub fn node_type(&self) -> Option<&str> {
        self.text(keys::NODE_TYPE)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            MetadataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn text_list(&self, key: &str) -> Option<&[String]> {
        match self.entries.get(key)? {
            MetadataValue::TextList(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            MetadataValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.entries.get(key)? {
            MetadataValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn nested(&self, key: &str) -> Option<&[ChunkMetadata]> {
        match self.entries.get(key)? {
            MetadataValue::Nested(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .insert(key.to_string(), MetadataValue::Text(value.into()));
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.entries
            .insert(key.to_string(), MetadataValue::Bool(value));
    }

    /// Store a text list; empty lists are dropped
    pub fn set_list(&mut self, key: &str, items: Vec<String>) {
        debug_assert_ne!(key, keys::PARAMETERS, "use set_parameters");
        if !items.is_empty() {
            self.entries
                .insert(key.to_string(), MetadataValue::TextList(items));
        }
    }

    /// Store nested records; empty lists are dropped
    pub fn set_nested(&mut self, key: &str, items: Vec<ChunkMetadata>) {
        if !items.is_empty() {
            self.entries
                .insert(key.to_string(), MetadataValue::Nested(items));
        }
    }

    /// Store `parameters` together with `param_count`, or neither when empty
    pub fn set_parameters(&mut self, names: Vec<String>) {
        if names.is_empty() {
            return;
        }
        let count = i64::try_from(names.len()).unwrap_or(i64::MAX);
        self.entries.insert(
            keys::PARAMETERS.to_string(),
            MetadataValue::TextList(names),
        );
        self.entries.insert(
            keys::PARAM_COUNT.to_string(),
            MetadataValue::Integer(count),
        );
    }

    /// Builder: set a text entry
    #[must_use]
    pub fn with_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_text(key, value);
        self
    }

    /// Builder: set a flag entry
    #[must_use]
    pub fn with_flag(mut self, key: &str, value: bool) -> Self {
        self.set_flag(key, value);
        self
    }

    /// Builder: set a text list entry
    #[must_use]
    pub fn with_list(mut self, key: &str, items: Vec<String>) -> Self {
        self.set_list(key, items);
        self
    }

    /// Builder: set parameters and their count
    #[must_use]
    pub fn with_parameters(mut self, names: Vec<String>) -> Self {
        self.set_parameters(names);
        self
    }
}
