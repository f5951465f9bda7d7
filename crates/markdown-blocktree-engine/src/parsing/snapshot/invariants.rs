use std::collections::HashSet;

use crate::parsing::blocks::containers::{FrameKind, is_outermost, list_nesting_level};
use crate::parsing::blocks::{Block, BlockKind, Document};

/// Validates block tree invariants.
///
/// Asserts that:
/// - Ids are unique within every sibling list
/// - Lists hold only list items, tables only rows, rows only cells
/// - `nesting_level` and `is_outermost` match each block's actual ancestors
/// - Table rows are padded to the column count and every cell is indexed
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(document: &Document) {
    check_siblings(document.root());
    let mut enclosing = Vec::new();
    for child in document.children() {
        check_block(child, &mut enclosing);
    }
}

fn check_siblings(parent: &Block) {
    let mut seen = HashSet::new();
    for child in parent.children() {
        assert!(
            seen.insert(child.id()),
            "duplicate sibling id {} under {}",
            child.id(),
            parent.kind().name()
        );
    }
}

fn check_children(parent: &Block, allowed: fn(&BlockKind) -> bool) {
    for child in parent.children() {
        assert!(
            allowed(child.kind()),
            "{} holds a {}",
            parent.kind().name(),
            child.kind().name()
        );
    }
}

fn check_block(block: &Block, enclosing: &mut Vec<FrameKind>) {
    check_siblings(block);

    match block.kind() {
        BlockKind::List(list) => {
            check_children(block, |kind| matches!(kind, BlockKind::ListItem { .. }));
            assert_eq!(
                list.nesting_level,
                list_nesting_level(enclosing, list.is_ordered),
                "list {} has a stale nesting level",
                block.id()
            );
        }
        BlockKind::Blockquote {
            is_outermost: flag, ..
        } => {
            assert_eq!(
                *flag,
                is_outermost(enclosing),
                "blockquote {} has a stale outermost flag",
                block.id()
            );
        }
        BlockKind::Table(table) => {
            check_children(block, |kind| matches!(kind, BlockKind::TableRow { .. }));
            let mut cells = 0;
            for row in table.rows() {
                assert!(
                    row.children().len() >= table.column_count(),
                    "table row {} has {} cells for {} columns",
                    row.id(),
                    row.children().len(),
                    table.column_count()
                );
                cells += row.children().len();
            }
            assert_eq!(table.cell_position_index().len(), cells, "cell index incomplete");
        }
        BlockKind::TableRow { .. } => {
            check_children(block, |kind| matches!(kind, BlockKind::TableCell { .. }));
        }
        BlockKind::Document { .. }
        | BlockKind::Paragraph { .. }
        | BlockKind::Header(_)
        | BlockKind::Code(_)
        | BlockKind::ThematicBreak
        | BlockKind::ListItem { .. }
        | BlockKind::TableCell { .. } => {}
    }

    enclosing.push(FrameKind::of_block(block.kind()));
    for child in block.children() {
        check_block(child, enclosing);
    }
    enclosing.pop();
}
