//! # Tree Builder
//!
//! Single pass over the runs of an [`AnnotatedText`], rebuilding the nesting that the
//! runs only describe implicitly.
//!
//! For each typed run the builder diffs the run's container components against the
//! previous typed run's:
//!
//! 1. containers that disappeared are closed, deepest identity first; the closing
//!    run is the container's end boundary
//! 2. containers that appeared are opened, shallowest identity first
//! 3. the run's single leaf component becomes a leaf block in the innermost container
//!
//! Untyped runs (no intent, or an empty one) become untyped paragraphs in the
//! innermost open container, or extra cells when that container is a table row.
//! They leave the set of open containers alone.
//!
//! ## Skip-ahead
//!
//! With a warm cache, opening a container first digests the slice of runs the
//! container covers. If the cache knows that digest, the cached block is placed as
//! is (after correcting its position metadata) and the builder jumps to the end of
//! the slice without looking at the runs inside. On a miss the digest is kept on
//! the frame and reused when the container closes.

use std::collections::HashSet;
use std::sync::Arc;

use super::containers::{
    ContainerFrame, ContainerStack, is_outermost, list_nesting_level, relocate,
};
use super::kinds::{CodeBlock, HeaderBlock, ListBlock, TableBlock};
use super::types::{Block, BlockKind, BlockNode};
use crate::parsing::cache::BlockCache;
use crate::parsing::digest::{
    Digest, container_digest, leaf_digest, untyped_cell_digest, untyped_digest,
};
use crate::parsing::error::ParseError;
use crate::parsing::intent::{AnnotatedText, IntentComponent, IntentKind, PresentationIntent};
use crate::parsing::stats::ParseStats;

pub(crate) struct TreeBuilder<'a> {
    source: &'a AnnotatedText,
    cache: &'a mut BlockCache,
    skip_ahead: bool,
    stack: ContainerStack,
    /// Container components of the last typed run, minus any that were skipped.
    active: HashSet<IntentComponent>,
    stats: ParseStats,
}

enum Reuse {
    Hit { end: usize },
    Miss { end: usize, digest: Digest },
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        source: &'a AnnotatedText,
        cache: &'a mut BlockCache,
        skip_ahead: bool,
    ) -> Self {
        Self {
            source,
            cache,
            skip_ahead,
            stack: ContainerStack::default(),
            active: HashSet::new(),
            stats: ParseStats::default(),
        }
    }

    /// Builds the top-level blocks of the document.
    pub(crate) fn build(mut self) -> Result<(Vec<Block>, ParseStats), ParseError> {
        let run_count = self.source.runs().len();
        self.stats.runs_total = run_count;

        let mut index = 0;
        while index < run_count {
            index = self.step(index)?;
        }
        while let Some(frame) = self.stack.top() {
            let component = frame.component.clone();
            self.close(&component, run_count)?;
        }
        Ok((self.stack.into_root(), self.stats))
    }

    /// Processes the run at `index` and returns the index of the next run to visit.
    fn step(&mut self, index: usize) -> Result<usize, ParseError> {
        let source = self.source;
        let run = &source.runs()[index];
        let Some(intent) = run.typed_intent() else {
            self.stats.runs_visited += 1;
            let block = self.untyped_leaf(source.run_text(run));
            self.stack.accumulator().push(block);
            return Ok(index + 1);
        };

        let active: HashSet<IntentComponent> = intent.containers().cloned().collect();
        let mut closed: Vec<IntentComponent> = self.active.difference(&active).cloned().collect();
        closed.sort_by(|a, b| b.identity.cmp(&a.identity));
        let mut opened: Vec<IntentComponent> = active.difference(&self.active).cloned().collect();
        opened.sort_by_key(|component| component.identity);
        self.active = active;

        for component in &closed {
            self.close(component, index)?;
        }

        for (position, component) in opened.iter().enumerate() {
            self.check_opens_inside(component, index)?;
            let probe = if self.skip_ahead {
                match self.reuse_subtree(component, index) {
                    Reuse::Hit { end } => {
                        for skipped in &opened[position..] {
                            self.active.remove(skipped);
                        }
                        self.stats.runs_skipped += end - index;
                        return Ok(end);
                    }
                    Reuse::Miss { end, digest } => Some((end, digest)),
                }
            } else {
                None
            };
            self.stack.push(component.clone(), index, probe);
        }

        self.stats.runs_visited += 1;
        let block = self.leaf(index, intent)?;
        self.stack.accumulator().push(block);
        Ok(index + 1)
    }

    /// A container may only open inside the innermost open one. Runs before the cache
    /// probe, so warm and cold parses reject the same input.
    fn check_opens_inside(
        &self,
        component: &IntentComponent,
        index: usize,
    ) -> Result<(), ParseError> {
        match self.stack.top() {
            Some(top) if !component.is_deeper_than(&top.component) => {
                Err(ParseError::malformed(
                    index,
                    format!(
                        "{} opens outside the still open {}",
                        component.kind.label(),
                        top.component.kind.label()
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    fn close(&mut self, component: &IntentComponent, end: usize) -> Result<(), ParseError> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.component == *component => frame,
            _ => {
                return Err(ParseError::UnbalancedContainer {
                    run: end,
                    kind: component.kind.label(),
                });
            }
        };
        let digest = match frame.probe {
            Some((probe_end, digest)) if probe_end == end => digest,
            _ => self.slice_digest(&frame.component, frame.start_run, end),
        };

        let kind = self.container_kind(frame, digest)?;
        let node = Arc::new(BlockNode::new(digest, kind));
        self.cache.insert(Arc::clone(&node));
        self.stats.blocks_built += 1;
        self.stack.accumulator().push(Block::new(node));
        Ok(())
    }

    fn container_kind(
        &self,
        frame: ContainerFrame,
        digest: Digest,
    ) -> Result<BlockKind, ParseError> {
        let enclosing = self.stack.frame_kinds();
        let ContainerFrame {
            component,
            start_run,
            children,
            ..
        } = frame;

        let kind = match component.kind {
            IntentKind::BlockQuote => BlockKind::Blockquote {
                is_outermost: is_outermost(&enclosing),
                children,
            },
            IntentKind::OrderedList | IntentKind::UnorderedList => {
                let is_ordered = matches!(component.kind, IntentKind::OrderedList);
                expect_children(&children, start_run, &component.kind, |kind| {
                    matches!(kind, BlockKind::ListItem { .. })
                })?;
                BlockKind::List(ListBlock {
                    is_ordered,
                    nesting_level: list_nesting_level(&enclosing, is_ordered),
                    children,
                })
            }
            IntentKind::ListItem { ordinal } => BlockKind::ListItem { ordinal, children },
            IntentKind::Table { ref columns } => {
                expect_children(&children, start_run, &component.kind, |kind| {
                    matches!(kind, BlockKind::TableRow { .. })
                })?;
                let alignments = columns.iter().map(|column| column.alignment).collect();
                BlockKind::Table(TableBlock::new(digest, alignments, children))
            }
            IntentKind::TableHeaderRow | IntentKind::TableRow { .. } => {
                expect_children(&children, start_run, &component.kind, |kind| {
                    matches!(kind, BlockKind::TableCell { .. })
                })?;
                BlockKind::TableRow {
                    is_header: matches!(component.kind, IntentKind::TableHeaderRow),
                    children,
                }
            }
            IntentKind::Paragraph
            | IntentKind::Header { .. }
            | IntentKind::CodeBlock { .. }
            | IntentKind::ThematicBreak
            | IntentKind::TableCell { .. } => {
                return Err(ParseError::malformed(
                    start_run,
                    format!("{} cannot hold blocks", component.kind.label()),
                ));
            }
        };
        Ok(kind)
    }

    /// Probes the cache for the whole subtree `component` is about to open.
    fn reuse_subtree(&mut self, component: &IntentComponent, start: usize) -> Reuse {
        let source = self.source;
        let runs = source.runs();
        let end = runs[start..]
            .iter()
            .position(|run| {
                run.typed_intent()
                    .is_some_and(|intent| !intent.contains(component))
            })
            .map_or(runs.len(), |offset| start + offset);

        let digest = self.slice_digest(component, start, end);
        let Some(cached) = self.cache.get(&digest) else {
            return Reuse::Miss { end, digest };
        };

        let node = relocate(&cached, &mut self.stack.frame_kinds());
        log::trace!(
            "reused {} {} for runs {start}..{end}",
            component.kind.label(),
            digest.short()
        );
        self.cache.insert(Arc::clone(&node));
        self.stats.subtree_hits += 1;
        self.stack.accumulator().push(Block::new(node));
        Reuse::Hit { end }
    }

    fn slice_digest(&mut self, component: &IntentComponent, start: usize, end: usize) -> Digest {
        self.stats.container_digests += 1;
        let source = self.source;
        container_digest(source, &source.runs()[start..end], component)
    }

    fn leaf(&mut self, index: usize, intent: &PresentationIntent) -> Result<Block, ParseError> {
        let mut leaves = intent.leaves();
        let leaf = match (leaves.next(), leaves.next()) {
            (Some(leaf), None) => leaf,
            (None, _) => return Err(ParseError::malformed(index, "run has no leaf intent")),
            (Some(first), Some(second)) => {
                return Err(ParseError::malformed(
                    index,
                    format!(
                        "run is both a {} and a {}",
                        first.kind.label(),
                        second.kind.label()
                    ),
                ));
            }
        };

        let source = self.source;
        let text = source.run_text(&source.runs()[index]);
        let kind = leaf_kind(&leaf.kind, text)
            .ok_or_else(|| ParseError::malformed(index, "container used as a leaf"))?;
        self.stats.leaf_digests += 1;
        Ok(self.reuse_or_build(leaf_digest(text, leaf), kind))
    }

    /// Untyped text inside a table row becomes an extra cell, anywhere else a
    /// paragraph.
    fn untyped_leaf(&mut self, text: &str) -> Block {
        self.stats.leaf_digests += 1;
        let in_row = self.stack.top().is_some_and(|frame| {
            matches!(
                frame.component.kind,
                IntentKind::TableHeaderRow | IntentKind::TableRow { .. }
            )
        });
        if in_row {
            let kind = BlockKind::TableCell {
                text: text.to_string(),
                is_filler: false,
            };
            return self.reuse_or_build(untyped_cell_digest(text), kind);
        }
        let kind = BlockKind::Paragraph {
            text: text.to_string(),
            is_untyped: true,
        };
        self.reuse_or_build(untyped_digest(text), kind)
    }

    fn reuse_or_build(&mut self, digest: Digest, kind: BlockKind) -> Block {
        if let Some(node) = self.cache.get(&digest) {
            self.stats.leaf_hits += 1;
            return Block::new(node);
        }
        let node = Arc::new(BlockNode::new(digest, kind));
        self.cache.insert(Arc::clone(&node));
        self.stats.blocks_built += 1;
        Block::new(node)
    }
}

fn leaf_kind(kind: &IntentKind, text: &str) -> Option<BlockKind> {
    let block = match kind {
        IntentKind::Paragraph => BlockKind::Paragraph {
            text: text.to_string(),
            is_untyped: false,
        },
        IntentKind::Header { level } => BlockKind::Header(HeaderBlock::new(*level, text)),
        IntentKind::CodeBlock { lang_hint } => {
            BlockKind::Code(CodeBlock::new(text, lang_hint.clone()))
        }
        IntentKind::ThematicBreak => BlockKind::ThematicBreak,
        IntentKind::TableCell { .. } => BlockKind::TableCell {
            text: text.to_string(),
            is_filler: false,
        },
        IntentKind::BlockQuote
        | IntentKind::OrderedList
        | IntentKind::UnorderedList
        | IntentKind::ListItem { .. }
        | IntentKind::Table { .. }
        | IntentKind::TableHeaderRow
        | IntentKind::TableRow { .. } => return None,
    };
    Some(block)
}

fn expect_children(
    children: &[Block],
    run: usize,
    container: &IntentKind,
    allowed: fn(&BlockKind) -> bool,
) -> Result<(), ParseError> {
    match children.iter().find(|child| !allowed(child.kind())) {
        Some(child) => Err(ParseError::malformed(
            run,
            format!("{} holds a {}", container.label(), child.kind().name()),
        )),
        None => Ok(()),
    }
}
