//! # Parsing
//!
//! Turns intent-tagged text into a [`Document`] block tree, reusing unchanged blocks
//! from the previous parse.
//!
//! ## Pipeline
//!
//! 1. **Annotate** (`intent::markdown`): Markdown source becomes an [`AnnotatedText`],
//!    one run per leaf block, each tagged with its leaf and container intents
//! 2. **Build** (`blocks::builder`): a single pass over the runs rebuilds the nesting,
//!    consulting the [`BlockCache`] for leaves and whole container subtrees
//! 3. **Commit**: on success the blocks built by this parse become the cache for the
//!    next one; on failure they are dropped and the previous state stays
//!
//! ## Modules
//!
//! - **`intent`**: runs, intent components, and the pulldown-cmark producer
//! - **`digest`**: normalised BLAKE3 content digests
//! - **`cache`**: the two-tier digest → block cache
//! - **`blocks`**: block types, the container stack, ids, and the tree builder
//! - **`snapshot`**: text rendering and invariant checks for tests and the CLI

pub mod blocks;
pub mod cache;
pub mod digest;
pub mod error;
pub mod intent;
pub mod options;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;

pub use blocks::{
    Block, BlockId, BlockKind, BlockNode, CellKey, CellPosition, CodeBlock, Document,
    HeaderBlock, ListBlock, ListItemDecorator, TableBlock,
};
pub use cache::BlockCache;
pub use digest::Digest;
pub use error::ParseError;
pub use intent::{
    Alignment, AnnotatedText, AnnotatedTextBuilder, ColumnSpec, IntentComponent, IntentKind,
    PresentationIntent, Run, markdown::annotate,
};
pub use options::ParserOptions;
pub use snapshot::{format_tree, format_tree_with};
pub use stats::ParseStats;

use blocks::builder::TreeBuilder;

/// Owns the state that makes parsing incremental: the block cache and the last
/// successfully parsed document.
#[derive(Debug, Default)]
pub struct Parser {
    options: ParserOptions,
    cache: BlockCache,
    document: Option<Document>,
    last_stats: ParseStats,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses Markdown source.
    pub fn parse(&mut self, markdown: &str) -> Result<Document, ParseError> {
        let source = annotate(markdown, &self.options);
        self.parse_annotated(&source)
    }

    /// Parses caller-supplied runs.
    ///
    /// Returns the previous document itself when the input is unchanged. On error
    /// the previous document and cache are kept as they were.
    pub fn parse_annotated(&mut self, source: &AnnotatedText) -> Result<Document, ParseError> {
        let digest = digest::document_digest(source);

        if self.options.incremental {
            if let Some(previous) = self.document.as_ref().filter(|doc| doc.digest() == digest) {
                log::debug!("document {} unchanged", digest.short());
                self.last_stats = ParseStats {
                    runs_total: source.runs().len(),
                    document_reused: true,
                    ..ParseStats::default()
                };
                return Ok(previous.clone());
            }
        } else {
            self.cache.clear();
        }

        let skip_ahead = self.options.incremental && self.cache.is_warm();
        match TreeBuilder::new(source, &mut self.cache, skip_ahead).build() {
            Ok((children, stats)) => {
                self.cache.commit();
                let document = Document::new(digest, children);
                log::debug!("parsed document {}: {stats}", digest.short());
                self.last_stats = stats;
                self.document = Some(document.clone());
                Ok(document)
            }
            Err(error) => {
                self.cache.abort();
                log::debug!("parse failed, keeping previous document: {error}");
                Err(error)
            }
        }
    }

    /// The last successfully parsed document.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Statistics of the last successful parse.
    pub fn last_stats(&self) -> &ParseStats {
        &self.last_stats
    }

    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    /// Forgets the previous document and every cached block.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.document = None;
        self.last_stats = ParseStats::default();
    }
}
