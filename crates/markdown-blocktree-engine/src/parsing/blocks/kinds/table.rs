//! Tables: row padding and the cell position index.

use std::collections::HashMap;
use std::sync::Arc;

use crate::parsing::blocks::ids::assign_sibling_ids;
use crate::parsing::blocks::types::{Block, BlockId, BlockKind, BlockNode};
use crate::parsing::digest::{Digest, filler_digest};
use crate::parsing::intent::Alignment;

/// Looks a cell up by the ids of its row and of the cell itself.
///
/// Cell ids are only unique inside their row, so the row id is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: BlockId,
    pub cell: BlockId,
}

/// Zero-based grid position; row 0 is the header row when there is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub column_alignments: Vec<Alignment>,
    rows: Vec<Block>,
    cell_position_index: HashMap<CellKey, CellPosition>,
}

impl TableBlock {
    /// Builds a table from its rows, padding short rows with filler cells.
    ///
    /// `digest` is the table's own digest; filler cells derive theirs from it.
    /// Children that are not table rows are passed through untouched.
    pub fn new(digest: Digest, column_alignments: Vec<Alignment>, rows: Vec<Block>) -> Self {
        let columns = column_alignments.len();
        let mut rows: Vec<Block> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| pad_row(&digest, index, columns, row))
            .collect();
        assign_sibling_ids(&mut rows);

        let mut cell_position_index = HashMap::new();
        for (row_index, row) in rows.iter().enumerate() {
            for (column, cell) in row.children().iter().enumerate() {
                cell_position_index.insert(
                    CellKey {
                        row: row.id(),
                        cell: cell.id(),
                    },
                    CellPosition {
                        row: row_index,
                        column,
                    },
                );
            }
        }

        Self {
            column_alignments,
            rows,
            cell_position_index,
        }
    }

    pub fn rows(&self) -> &[Block] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_alignments.len()
    }

    pub fn header(&self) -> Option<&Block> {
        self.rows
            .first()
            .filter(|row| matches!(row.kind(), BlockKind::TableRow { is_header: true, .. }))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Block> {
        self.rows.get(row)?.children().get(column)
    }

    pub fn cell_position(&self, row: BlockId, cell: BlockId) -> Option<CellPosition> {
        self.cell_position_index
            .get(&CellKey { row, cell })
            .copied()
    }

    pub fn cell_position_index(&self) -> &HashMap<CellKey, CellPosition> {
        &self.cell_position_index
    }
}

fn pad_row(table: &Digest, index: usize, columns: usize, row: Block) -> Block {
    let BlockKind::TableRow {
        is_header,
        children,
    } = row.kind()
    else {
        return row;
    };
    // Fillers from an earlier padding are dropped so a reused row fits this table.
    let mut cells: Vec<Block> = children
        .iter()
        .filter(|cell| !matches!(cell.kind(), BlockKind::TableCell { is_filler: true, .. }))
        .cloned()
        .collect();
    if cells.len() == children.len() && cells.len() >= columns {
        return row;
    }

    for column in cells.len()..columns {
        cells.push(Block::new(Arc::new(BlockNode::new(
            filler_digest(table, index, column),
            BlockKind::TableCell {
                text: String::new(),
                is_filler: true,
            },
        ))));
    }
    let padded = BlockNode::new(
        row.digest(),
        BlockKind::TableRow {
            is_header: *is_header,
            children: cells,
        },
    );
    Block::with_id(row.id(), Arc::new(padded))
}
