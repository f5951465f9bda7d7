//! The stack of open containers and the position-dependent metadata derived from it.
//!
//! Two container attributes depend on where a container sits rather than on what it
//! contains: `List::nesting_level` and `Blockquote::is_outermost`. Both are computed
//! from the enclosing frames when the container closes, and recomputed for a whole
//! reused subtree when the cache hands back a block built somewhere else.

use std::sync::Arc;

use super::types::{Block, BlockKind, BlockNode};
use crate::parsing::digest::Digest;
use crate::parsing::intent::{IntentComponent, IntentKind};

/// What the position-dependent rules need to know about an enclosing container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    BlockQuote,
    List { ordered: bool },
    ListItem,
    Other,
}

impl FrameKind {
    pub(crate) fn of_intent(kind: &IntentKind) -> Self {
        match kind {
            IntentKind::BlockQuote => FrameKind::BlockQuote,
            IntentKind::OrderedList => FrameKind::List { ordered: true },
            IntentKind::UnorderedList => FrameKind::List { ordered: false },
            IntentKind::ListItem { .. } => FrameKind::ListItem,
            _ => FrameKind::Other,
        }
    }

    pub(crate) fn of_block(kind: &BlockKind) -> Self {
        match kind {
            BlockKind::Blockquote { .. } => FrameKind::BlockQuote,
            BlockKind::List(list) => FrameKind::List {
                ordered: list.is_ordered,
            },
            BlockKind::ListItem { .. } => FrameKind::ListItem,
            _ => FrameKind::Other,
        }
    }
}

/// Nesting level of a list whose ancestors are `enclosing` (shallow to deep).
///
/// Walks outward skipping list items and counting lists of the same orderedness;
/// any other container, or a list of the other orderedness, ends the walk.
pub(crate) fn list_nesting_level(enclosing: &[FrameKind], ordered: bool) -> u32 {
    let mut level = 1;
    for frame in enclosing.iter().rev() {
        match frame {
            FrameKind::ListItem => continue,
            FrameKind::List { ordered: o } if *o == ordered => level += 1,
            _ => break,
        }
    }
    level
}

/// A blockquote is outermost when no other blockquote encloses it.
pub(crate) fn is_outermost(enclosing: &[FrameKind]) -> bool {
    !enclosing.contains(&FrameKind::BlockQuote)
}

/// Re-derives position metadata for `node` and its descendants as if it were
/// placed under `enclosing`. Nodes whose metadata is already right are shared,
/// so an unchanged subtree comes back as the same `Arc`.
pub(crate) fn relocate(node: &Arc<BlockNode>, enclosing: &mut Vec<FrameKind>) -> Arc<BlockNode> {
    let corrected = match &node.kind {
        BlockKind::List(list) => {
            let level = list_nesting_level(enclosing, list.is_ordered);
            (level != list.nesting_level).then_some(Correction::NestingLevel(level))
        }
        BlockKind::Blockquote {
            is_outermost: current,
            ..
        } => {
            let outermost = is_outermost(enclosing);
            (outermost != *current).then_some(Correction::Outermost(outermost))
        }
        // Rows and cells never hold lists or quotes.
        BlockKind::Table(_) => return Arc::clone(node),
        _ => None,
    };

    enclosing.push(FrameKind::of_block(&node.kind));
    let mut children: Option<Vec<Block>> = None;
    for (index, child) in node.kind.children().iter().enumerate() {
        if !child.is_container() {
            continue;
        }
        let moved = relocate(child.node(), enclosing);
        if !Arc::ptr_eq(&moved, child.node()) {
            children.get_or_insert_with(|| node.kind.children().to_vec())[index] =
                Block::with_id(child.id(), moved);
        }
    }
    enclosing.pop();

    if corrected.is_none() && children.is_none() {
        return Arc::clone(node);
    }

    let mut kind = node.kind.clone();
    match (&mut kind, corrected) {
        (BlockKind::List(list), Some(Correction::NestingLevel(level))) => list.nesting_level = level,
        (BlockKind::Blockquote { is_outermost, .. }, Some(Correction::Outermost(outermost))) => {
            *is_outermost = outermost
        }
        _ => {}
    }
    if let (Some(children), Some(slot)) = (children, kind.children_mut()) {
        *slot = children;
    }
    // Not `BlockNode::new`: child ids are already assigned and must not move.
    Arc::new(BlockNode {
        digest: node.digest,
        kind,
    })
}

enum Correction {
    NestingLevel(u32),
    Outermost(bool),
}

/// One open container.
#[derive(Debug)]
pub(crate) struct ContainerFrame {
    pub component: IntentComponent,
    pub start_run: usize,
    pub children: Vec<Block>,
    /// Slice digest from a skip-ahead probe that missed: `(end_run, digest)`.
    pub probe: Option<(usize, Digest)>,
}

/// Open containers, shallow to deep, plus the document-level accumulator.
#[derive(Debug, Default)]
pub(crate) struct ContainerStack {
    root: Vec<Block>,
    frames: Vec<ContainerFrame>,
}

impl ContainerStack {
    pub(crate) fn push(
        &mut self,
        component: IntentComponent,
        start_run: usize,
        probe: Option<(usize, Digest)>,
    ) {
        self.frames.push(ContainerFrame {
            component,
            start_run,
            children: Vec::new(),
            probe,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<ContainerFrame> {
        self.frames.pop()
    }

    pub(crate) fn top(&self) -> Option<&ContainerFrame> {
        self.frames.last()
    }

    /// Children accumulator of the innermost open container.
    pub(crate) fn accumulator(&mut self) -> &mut Vec<Block> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    pub(crate) fn frame_kinds(&self) -> Vec<FrameKind> {
        self.frames
            .iter()
            .map(|frame| FrameKind::of_intent(&frame.component.kind))
            .collect()
    }

    pub(crate) fn into_root(self) -> Vec<Block> {
        self.root
    }
}
