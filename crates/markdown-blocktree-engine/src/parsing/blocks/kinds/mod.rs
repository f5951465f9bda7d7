//! Kind-specific block payloads and the knowledge that belongs to each kind.

pub mod code;
pub mod header;
pub mod list;
pub mod table;

pub use code::CodeBlock;
pub use header::HeaderBlock;
pub use list::{ListBlock, ListItemDecorator};
pub use table::{CellKey, CellPosition, TableBlock};
