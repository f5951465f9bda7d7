use std::fmt;

use crate::parsing::blocks::types::{Block, BlockKind};

/// An ordered or unordered list. Children are always list items.
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub is_ordered: bool,
    /// 1 for a top-level list, +1 for each directly enclosing list of the same
    /// orderedness.
    pub nesting_level: u32,
    pub children: Vec<Block>,
}

impl ListBlock {
    /// Marker to draw in front of the item with `ordinal`.
    pub fn decorator(&self, ordinal: u32) -> ListItemDecorator {
        if self.is_ordered {
            ListItemDecorator::Number(ordinal)
        } else {
            ListItemDecorator::Bullet(ListItemDecorator::bullet_for_level(self.nesting_level))
        }
    }

    /// Items paired with their ordinal.
    pub fn items(&self) -> impl Iterator<Item = (u32, &Block)> {
        self.children.iter().filter_map(|child| match child.kind() {
            BlockKind::ListItem { ordinal, .. } => Some((*ordinal, child)),
            _ => None,
        })
    }
}

/// The marker in front of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItemDecorator {
    Bullet(char),
    Number(u32),
}

impl ListItemDecorator {
    const BULLETS: [char; 4] = ['•', '◦', '▪', '▫'];

    fn bullet_for_level(level: u32) -> char {
        let index = level.saturating_sub(1) as usize;
        Self::BULLETS[index.min(Self::BULLETS.len() - 1)]
    }

    pub fn marker(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ListItemDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListItemDecorator::Bullet(bullet) => write!(f, "{bullet}"),
            ListItemDecorator::Number(ordinal) => write!(f, "{ordinal}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn list(is_ordered: bool, nesting_level: u32) -> ListBlock {
        ListBlock {
            is_ordered,
            nesting_level,
            children: vec![],
        }
    }

    #[rstest]
    #[case(1, "•")]
    #[case(2, "◦")]
    #[case(3, "▪")]
    #[case(4, "▫")]
    #[case(9, "▫")]
    fn unordered_bullets_follow_nesting(#[case] level: u32, #[case] expected: &str) {
        assert_eq!(list(false, level).decorator(1).marker(), expected);
    }

    #[test]
    fn ordered_markers_use_ordinal() {
        assert_eq!(list(true, 2).decorator(7).marker(), "7.");
    }
}
