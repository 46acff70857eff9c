//! # Semchunk Code Chunker
//!
//! Splits source files into declaration-sized chunks (functions, structs,
//! types) for embedding and retrieval.
//!
//! ## Architecture
//!
//! ```text
//! Source bytes
//!     │
//!     ├──> SyntaxProvider (tree-sitter or caller-supplied) → SyntaxTree
//!     │
//!     ├──> LanguageRegistry: language id → (NodeClassifier, MetadataExtractor)
//!     │
//!     └──> Chunker (pre-order walk)
//!          ├─> splittable node → one Chunk, descendants skipped
//!          ├─> other node      → descend into children
//!          └─> Chunk { span, lines, text, metadata }
//! ```
//!
//! Language plugins are a classifier (which node kinds are chunk boundaries)
//! and an extractor (what metadata a boundary node carries). Most plugins are
//! a static [`ExtractionProfile`] table driven by [`ProfileExtractor`].
//!
//! ## Example
//!
//! ```rust
//! use semchunk_code_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//!
//! let code = br#"
//! def process_data(text, limit=10):
//!     return text.strip()[:limit]
//! "#;
//!
//! let chunks = chunker.chunk_source("python", code).unwrap();
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].name(), Some("process_data"));
//! assert_eq!(chunks[0].metadata.integer("param_count"), Some(2));
//! ```

mod chunker;
mod classifier;
mod config;
mod error;
mod extractor;
mod language;
pub mod languages;
mod provider;
mod registry;
mod syntax;
mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use classifier::{NodeClassifier, SplittableKindSet};
pub use config::{ChunkerConfig, DEFAULT_MAX_FILE_BYTES};
pub use error::{ChunkerError, Result};
pub use extractor::{
    DeclarationKind, ExtractionProfile, MemberKind, MemberLists, MetadataExtractor,
    ProfileExtractor, VisibilitySource,
};
pub use language::Language;
pub use provider::{SyntaxProvider, TreeSitterProvider};
pub use registry::{LanguagePlugin, LanguageRegistry};
pub use syntax::{Field, Node, NodeId, SyntaxTree, TreeBuilder};
pub use types::{keys, Chunk, ChunkMetadata, MetadataValue};
