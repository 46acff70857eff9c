use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::provider::SyntaxProvider;
use crate::registry::{LanguagePlugin, LanguageRegistry};
use crate::syntax::{Node, SyntaxTree};
use crate::types::Chunk;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Main chunker interface for processing code
///
/// Stateless per call: one `Chunker` can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    registry: Arc<LanguageRegistry>,
}

impl Chunker {
    /// Create a chunker over the global language registry
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        Self::with_registry(config, LanguageRegistry::global())
    }

    /// Create a chunker over a caller-built registry
    pub fn with_registry(config: ChunkerConfig, registry: Arc<LanguageRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// Chunk source bytes with the language's bundled syntax provider
    pub fn chunk_source(&self, language: &str, source: &[u8]) -> Result<Vec<Chunk>> {
        let plugin = self.plugin(language)?;
        let provider = plugin
            .provider
            .as_deref()
            .ok_or_else(|| ChunkerError::NoSyntaxProvider(language.to_string()))?;
        self.chunk_with_provider(language, source, provider)
    }

    /// Chunk source bytes with an explicit syntax provider
    pub fn chunk_with_provider(
        &self,
        language: &str,
        source: &[u8],
        provider: &dyn SyntaxProvider,
    ) -> Result<Vec<Chunk>> {
        self.plugin(language)?;
        self.config.check_size(source.len())?;
        let tree = provider.parse(source)?;
        self.chunk_tree(language, &tree, source)
    }

    /// Chunk code from a file, detecting the language from its extension
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        match Language::from_path(path) {
            Language::Unknown => Err(ChunkerError::unknown_language(
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("<none>"),
            )),
            language => self.chunk_file_as(path, language.as_str()),
        }
    }

    /// Chunk code from a file with an explicit language
    pub fn chunk_file_as(&self, path: impl AsRef<Path>, language: &str) -> Result<Vec<Chunk>> {
        let path = path.as_ref();
        self.plugin(language)?;
        if let Ok(meta) = std::fs::metadata(path) {
            self.config
                .check_size(usize::try_from(meta.len()).unwrap_or(usize::MAX))?;
        }
        let source = std::fs::read(path)?;
        let chunks = self.chunk_source(language, &source)?;
        log::debug!("{}: {} chunks", path.display(), chunks.len());
        Ok(chunks)
    }

    /// Chunk an already parsed tree.
    ///
    /// Depth-first pre-order walk from the root: a splittable node becomes one
    /// chunk and its descendants are not visited; any other node is descended
    /// into. The root itself is never a chunk, so a file without splittable
    /// nodes yields no chunks. Sources that are not valid UTF-8 are rejected
    /// so chunk text always equals the source bytes of its span.
    pub fn chunk_tree(&self, language: &str, tree: &SyntaxTree, source: &[u8]) -> Result<Vec<Chunk>> {
        let plugin = self.plugin(language)?;
        self.config.check_size(source.len())?;

        if tree.has_error() {
            return Err(ChunkerError::parse(format!(
                "{language} syntax tree contains error nodes"
            )));
        }
        if let Err(e) = std::str::from_utf8(source) {
            return Err(ChunkerError::parse(format!(
                "{language} source is not valid UTF-8 (byte {})",
                e.valid_up_to()
            )));
        }
        let root = tree.root();
        if root.end_byte() > source.len() {
            return Err(ChunkerError::InvalidBoundaries {
                start: root.start_byte(),
                end: root.end_byte(),
            });
        }

        let lines = LineIndex::new(source);
        let mut chunks = Vec::new();
        let mut stack: Vec<Node<'_>> = root.children().rev().collect();

        while let Some(node) = stack.pop() {
            if plugin.classifier.is_splittable(node.kind()) {
                chunks.push(Self::node_to_chunk(language, plugin, node, source, &lines));
            } else {
                stack.extend(node.children().rev());
            }
        }

        if chunks.is_empty() {
            log::debug!("{language}: no splittable nodes in {} bytes", source.len());
        }
        Ok(chunks)
    }

    fn node_to_chunk(
        language: &str,
        plugin: &LanguagePlugin,
        node: Node<'_>,
        source: &[u8],
        lines: &LineIndex,
    ) -> Chunk {
        let range = node.byte_range();
        Chunk {
            language: language.to_string(),
            kind: node.kind().to_string(),
            byte_start: range.start,
            byte_end: range.end,
            start_line: lines.line_of(range.start),
            end_line: lines.line_of(range.end.saturating_sub(1).max(range.start)),
            text: node.utf8_text(source).into_owned(),
            metadata: plugin.extractor.extract(node, source),
        }
    }

    fn plugin(&self, language: &str) -> Result<&LanguagePlugin> {
        if !self.config.allows_language(language) {
            return Err(ChunkerError::unknown_language(language));
        }
        self.registry.plugin(language)
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        let mut by_node_type = BTreeMap::new();
        for chunk in chunks {
            *by_node_type.entry(chunk.kind.clone()).or_insert(0) += 1;
        }
        let total_bytes: usize = chunks.iter().map(Chunk::byte_len).sum();

        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(Chunk::line_count).sum(),
            total_bytes,
            avg_bytes_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_bytes / chunks.len()
            },
            min_bytes: chunks.iter().map(Chunk::byte_len).min().unwrap_or(0),
            max_bytes: chunks.iter().map(Chunk::byte_len).max().unwrap_or(0),
            by_node_type,
        }
    }
}

/// Byte offset → 1-indexed line lookup, built once per file
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .iter()
                .enumerate()
                .filter_map(|(idx, &byte)| (byte == b'\n').then_some(idx + 1)),
        );
        Self { line_starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_bytes: usize,
    pub avg_bytes_per_chunk: usize,
    pub min_bytes: usize,
    pub max_bytes: usize,
    pub by_node_type: BTreeMap<String, usize>,
}

impl ChunkingStats {
    /// Fold another file's statistics into this one
    pub fn merge(&mut self, other: &Self) {
        if other.total_chunks == 0 {
            return;
        }
        self.min_bytes = if self.total_chunks == 0 {
            other.min_bytes
        } else {
            self.min_bytes.min(other.min_bytes)
        };
        self.max_bytes = self.max_bytes.max(other.max_bytes);
        self.total_chunks += other.total_chunks;
        self.total_lines += other.total_lines;
        self.total_bytes += other.total_bytes;
        self.avg_bytes_per_chunk = self.total_bytes / self.total_chunks;
        for (kind, count) in &other.by_node_type {
            *self.by_node_type.entry(kind.clone()).or_insert(0) += count;
        }
    }
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Bytes: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_lines,
            self.total_bytes,
            self.avg_bytes_per_chunk,
            self.min_bytes,
            self.max_bytes
        )
    }
}
