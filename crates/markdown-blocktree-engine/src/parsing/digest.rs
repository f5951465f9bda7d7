//! # Digest Engine
//!
//! Structural content hashes for blocks. A digest covers the text of a run (or a
//! slice of runs) together with its *normalised* intents, so the same Markdown
//! content hashes the same wherever it sits in the document.
//!
//! Two normalisations exist:
//!
//! - **Leaf**: container components are dropped (tree position already says where
//!   the leaf lives) and the single remaining leaf component is hashed with
//!   identity 1.
//! - **Container**: for a slice of runs belonging to one container component, every
//!   component shallower than that container is dropped and the rest are rebased so
//!   the container has identity 1. Relative nesting inside the slice survives,
//!   absolute position does not.
//!
//! Components are always fed sorted by identity, so the order in which a producer
//! lists them inside a run never changes the digest. Hashing uses BLAKE3 with a
//! distinct domain tag per purpose.

use std::fmt;

use super::intent::{AnnotatedText, IntentComponent, IntentKind, Run};

/// A 256-bit BLAKE3 content digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// First eight hex characters, for logs and snapshots.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }

    /// Derives a new digest from this one and a counter.
    pub(crate) fn derive(&self, domain: Domain, counter: u64) -> Digest {
        let mut hasher = DigestBuilder::new(domain);
        hasher.bytes(&self.0);
        hasher.u64(counter);
        hasher.finish()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Separates digests computed for different purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Domain {
    Leaf,
    Untyped,
    UntypedCell,
    Container,
    Document,
    FillerCell,
    DuplicateId,
}

impl Domain {
    fn tag(self) -> &'static [u8] {
        match self {
            Domain::Leaf => b"leaf",
            Domain::Untyped => b"untyped",
            Domain::UntypedCell => b"untyped-cell",
            Domain::Container => b"container",
            Domain::Document => b"document",
            Domain::FillerCell => b"filler-cell",
            Domain::DuplicateId => b"duplicate-id",
        }
    }
}

/// Incremental hasher with length-prefixed fields.
pub(crate) struct DigestBuilder {
    hasher: blake3::Hasher,
}

impl DigestBuilder {
    pub(crate) fn new(domain: Domain) -> Self {
        let mut builder = Self {
            hasher: blake3::Hasher::new(),
        };
        builder.bytes(domain.tag());
        builder
    }

    pub(crate) fn u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    pub(crate) fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.u64(bytes.len() as u64);
        self.hasher.update(bytes);
        self
    }

    pub(crate) fn text(&mut self, text: &str) -> &mut Self {
        self.bytes(text.as_bytes())
    }

    pub(crate) fn component(&mut self, kind: &IntentKind, identity: u32) -> &mut Self {
        self.kind(kind);
        self.u64(u64::from(identity))
    }

    fn kind(&mut self, kind: &IntentKind) {
        match kind {
            IntentKind::Paragraph => {
                self.u64(0);
            }
            IntentKind::Header { level } => {
                self.u64(1).u64(u64::from(*level));
            }
            IntentKind::CodeBlock { lang_hint } => {
                self.u64(2);
                match lang_hint {
                    Some(hint) => self.u64(1).text(hint),
                    None => self.u64(0),
                };
            }
            IntentKind::ThematicBreak => {
                self.u64(3);
            }
            IntentKind::BlockQuote => {
                self.u64(4);
            }
            IntentKind::OrderedList => {
                self.u64(5);
            }
            IntentKind::UnorderedList => {
                self.u64(6);
            }
            IntentKind::ListItem { ordinal } => {
                self.u64(7).u64(u64::from(*ordinal));
            }
            IntentKind::Table { columns } => {
                self.u64(8).u64(columns.len() as u64);
                for column in columns {
                    self.u64(column.alignment as u64);
                }
            }
            IntentKind::TableHeaderRow => {
                self.u64(9);
            }
            IntentKind::TableRow { index } => {
                self.u64(10).u64(u64::from(*index));
            }
            IntentKind::TableCell { column } => {
                self.u64(11).u64(u64::from(*column));
            }
        }
    }

    pub(crate) fn finish(&self) -> Digest {
        Digest(*self.hasher.finalize().as_bytes())
    }
}

/// Digest of a leaf run: the leaf component at identity 1 plus the run text.
pub(crate) fn leaf_digest(text: &str, leaf: &IntentComponent) -> Digest {
    let mut builder = DigestBuilder::new(Domain::Leaf);
    builder.component(&leaf.kind.positionless(), 1).text(text);
    builder.finish()
}

/// Digest of a run with no presentation intent.
pub(crate) fn untyped_digest(text: &str) -> Digest {
    let mut builder = DigestBuilder::new(Domain::Untyped);
    builder.text(text);
    builder.finish()
}

/// Digest of untyped text placed in a table row.
pub(crate) fn untyped_cell_digest(text: &str) -> Digest {
    let mut builder = DigestBuilder::new(Domain::UntypedCell);
    builder.text(text);
    builder.finish()
}

/// Digest of the runs belonging to `target`, rebased so `target` is identity 1.
pub(crate) fn container_digest(
    source: &AnnotatedText,
    runs: &[Run],
    target: &IntentComponent,
) -> Digest {
    let offset = target.identity.saturating_sub(1);
    let mut builder = DigestBuilder::new(Domain::Container);
    builder.u64(runs.len() as u64);
    for run in runs {
        match run.typed_intent() {
            None => {
                builder.u64(0);
            }
            Some(intent) => {
                let inner: Vec<_> = intent
                    .by_depth()
                    .into_iter()
                    .filter(|c| c.identity >= target.identity)
                    .collect();
                builder.u64(inner.len() as u64 + 1);
                for component in inner {
                    builder.component(&component.kind.positionless(), component.identity - offset);
                }
            }
        }
        builder.text(source.run_text(run));
    }
    builder.finish()
}

/// Digest of a whole annotated text, absolute identities included.
pub(crate) fn document_digest(source: &AnnotatedText) -> Digest {
    let mut builder = DigestBuilder::new(Domain::Document);
    builder.u64(source.runs().len() as u64);
    for run in source.runs() {
        match run.typed_intent() {
            None => {
                builder.u64(0);
            }
            Some(intent) => {
                let components = intent.by_depth();
                builder.u64(components.len() as u64 + 1);
                for component in components {
                    builder.component(&component.kind, component.identity);
                }
            }
        }
        builder.text(source.run_text(run));
    }
    builder.finish()
}

/// Digest of a synthetic cell padding a short table row.
pub(crate) fn filler_digest(table: &Digest, row: usize, column: usize) -> Digest {
    let mut builder = DigestBuilder::new(Domain::FillerCell);
    builder.bytes(table.as_bytes()).u64(row as u64).u64(column as u64);
    builder.finish()
}
