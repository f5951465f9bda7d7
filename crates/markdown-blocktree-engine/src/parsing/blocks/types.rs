use std::fmt;
use std::sync::Arc;

use crate::parsing::digest::Digest;

use super::ids;
use super::kinds::{CodeBlock, HeaderBlock, ListBlock, TableBlock};

/// UI-facing identifier of a block, unique among its siblings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(Digest);

impl BlockId {
    pub(crate) fn from_digest(digest: Digest) -> Self {
        Self(digest)
    }

    pub fn digest(&self) -> Digest {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0.short())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.short())
    }
}

/// A block placed in a tree: a sibling id plus shared, immutable content.
///
/// The content is reference counted so an unchanged subtree found in the cache is
/// placed into the new tree without copying. The id lives here rather than in the
/// node because the same node can sit in different sibling lists across parses.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    node: Arc<BlockNode>,
}

impl Block {
    pub(crate) fn new(node: Arc<BlockNode>) -> Self {
        Self {
            id: BlockId::from_digest(node.digest),
            node,
        }
    }

    pub(crate) fn with_id(id: BlockId, node: Arc<BlockNode>) -> Self {
        Self { id, node }
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn digest(&self) -> Digest {
        self.node.digest
    }

    pub fn kind(&self) -> &BlockKind {
        &self.node.kind
    }

    pub fn node(&self) -> &Arc<BlockNode> {
        &self.node
    }

    /// Child blocks, empty for leaves.
    pub fn children(&self) -> &[Block] {
        self.node.kind.children()
    }

    pub fn is_container(&self) -> bool {
        self.node.kind.is_container()
    }

    /// True if both blocks point at the very same node (reuse, not just equality).
    pub fn shares_node(&self, other: &Block) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Visits this block and all descendants depth first, with their depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Block, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Block, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }
}

/// Immutable block content identified by its digest.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub digest: Digest,
    pub kind: BlockKind,
}

impl BlockNode {
    /// Builds a node; direct children of containers get their sibling ids here.
    pub fn new(digest: Digest, mut kind: BlockKind) -> Self {
        if let Some(children) = kind.children_mut() {
            ids::assign_sibling_ids(children);
        }
        Self { digest, kind }
    }
}

/// Every block variant the builder can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Document {
        children: Vec<Block>,
    },
    Paragraph {
        text: String,
        /// Built from a run with no presentation intent.
        is_untyped: bool,
    },
    Header(HeaderBlock),
    Code(CodeBlock),
    ThematicBreak,
    Blockquote {
        is_outermost: bool,
        children: Vec<Block>,
    },
    List(ListBlock),
    ListItem {
        ordinal: u32,
        children: Vec<Block>,
    },
    Table(TableBlock),
    TableRow {
        is_header: bool,
        children: Vec<Block>,
    },
    TableCell {
        text: String,
        /// Synthetic cell padding a short row.
        is_filler: bool,
    },
}

impl BlockKind {
    pub fn is_container(&self) -> bool {
        match self {
            BlockKind::Document { .. }
            | BlockKind::Blockquote { .. }
            | BlockKind::List(_)
            | BlockKind::ListItem { .. }
            | BlockKind::Table(_)
            | BlockKind::TableRow { .. } => true,
            BlockKind::Paragraph { .. }
            | BlockKind::Header(_)
            | BlockKind::Code(_)
            | BlockKind::ThematicBreak
            | BlockKind::TableCell { .. } => false,
        }
    }

    pub fn children(&self) -> &[Block] {
        match self {
            BlockKind::Document { children }
            | BlockKind::Blockquote { children, .. }
            | BlockKind::ListItem { children, .. }
            | BlockKind::TableRow { children, .. } => children,
            BlockKind::List(list) => &list.children,
            BlockKind::Table(table) => table.rows(),
            BlockKind::Paragraph { .. }
            | BlockKind::Header(_)
            | BlockKind::Code(_)
            | BlockKind::ThematicBreak
            | BlockKind::TableCell { .. } => &[],
        }
    }

    /// Children whose ids this node's constructor is responsible for.
    ///
    /// Tables assign ids to their (padded) rows themselves, because the cell
    /// position index is keyed by those ids.
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            BlockKind::Document { children }
            | BlockKind::Blockquote { children, .. }
            | BlockKind::ListItem { children, .. }
            | BlockKind::TableRow { children, .. } => Some(children),
            BlockKind::List(list) => Some(&mut list.children),
            BlockKind::Table(_)
            | BlockKind::Paragraph { .. }
            | BlockKind::Header(_)
            | BlockKind::Code(_)
            | BlockKind::ThematicBreak
            | BlockKind::TableCell { .. } => None,
        }
    }

    /// Variant name, used by snapshots and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Document { .. } => "Document",
            BlockKind::Paragraph { .. } => "Paragraph",
            BlockKind::Header(_) => "Header",
            BlockKind::Code(_) => "Code",
            BlockKind::ThematicBreak => "ThematicBreak",
            BlockKind::Blockquote { .. } => "Blockquote",
            BlockKind::List(_) => "List",
            BlockKind::ListItem { .. } => "ListItem",
            BlockKind::Table(_) => "Table",
            BlockKind::TableRow { .. } => "TableRow",
            BlockKind::TableCell { .. } => "TableCell",
        }
    }
}

/// The root of a parsed tree.
///
/// Its digest covers the whole annotated input, absolute identities included, so
/// an unchanged input is recognised without building anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Block,
}

impl Document {
    pub(crate) fn new(digest: Digest, children: Vec<Block>) -> Self {
        Self {
            root: Block::new(Arc::new(BlockNode::new(
                digest,
                BlockKind::Document { children },
            ))),
        }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn children(&self) -> &[Block] {
        self.root.children()
    }

    pub fn digest(&self) -> Digest {
        self.root.digest()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// True if `other` is the very same tree (not a rebuilt equal one).
    pub fn is_same(&self, other: &Document) -> bool {
        self.root.shares_node(&other.root)
    }
}
