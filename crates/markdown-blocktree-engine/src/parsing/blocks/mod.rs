//! # Block Tree
//!
//! The output side of the parser: an immutable tree of [`Block`]s rooted at a
//! [`Document`].
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `BlockNode`, `BlockKind`, `BlockId`, `Document`
//! - **`kinds`**: kind-specific payloads (headers, code, lists, tables)
//! - **`containers`**: the open container stack and position-dependent metadata
//! - **`ids`**: sibling id assignment
//! - **`builder`**: `TreeBuilder`, the single pass from runs to blocks
//!
//! ## Key Invariants
//!
//! - A block's digest depends only on its normalised content, never on its position
//! - Ids are unique within one sibling list and nowhere else
//! - `List::nesting_level` and `Blockquote::is_outermost` always match the block's
//!   actual ancestors, including inside reused subtrees

pub mod builder;
pub mod containers;
pub mod ids;
pub mod kinds;
pub mod types;

pub use kinds::{
    CellKey, CellPosition, CodeBlock, HeaderBlock, ListBlock, ListItemDecorator, TableBlock,
};
pub use types::{Block, BlockId, BlockKind, BlockNode, Document};
