//! Two-tier block cache keyed by digest.
//!
//! `persisted` holds every block of the last successful parse; `building` collects
//! the blocks of the parse in progress. A lookup tries `building` first, then
//! `persisted`. A persisted hit is copied into `building` together with all of its
//! descendants, so blocks reused this time are still available next time even if
//! they are never visited individually.

use std::collections::HashMap;
use std::sync::Arc;

use crate::parsing::blocks::BlockNode;
use crate::parsing::digest::Digest;

#[derive(Debug, Default)]
pub struct BlockCache {
    persisted: HashMap<Digest, Arc<BlockNode>>,
    building: HashMap<Digest, Arc<BlockNode>>,
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a parse has been committed.
    pub fn is_warm(&self) -> bool {
        !self.persisted.is_empty()
    }

    /// Number of blocks the next parse can reuse.
    pub fn len(&self) -> usize {
        self.persisted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persisted.is_empty()
    }

    pub fn get(&mut self, digest: &Digest) -> Option<Arc<BlockNode>> {
        if let Some(node) = self.building.get(digest) {
            return Some(Arc::clone(node));
        }
        let node = Arc::clone(self.persisted.get(digest)?);
        self.carry_forward(&node);
        Some(node)
    }

    pub fn insert(&mut self, node: Arc<BlockNode>) {
        self.building.insert(node.digest, node);
    }

    /// The parse succeeded: what was built becomes what can be reused.
    pub fn commit(&mut self) {
        self.persisted = std::mem::take(&mut self.building);
    }

    /// The parse failed: forget everything it built.
    pub fn abort(&mut self) {
        self.building.clear();
    }

    pub fn clear(&mut self) {
        self.persisted.clear();
        self.building.clear();
    }

    fn carry_forward(&mut self, node: &Arc<BlockNode>) {
        for child in node.kind.children() {
            self.carry_forward(child.node());
        }
        self.building
            .entry(node.digest)
            .or_insert_with(|| Arc::clone(node));
    }
}
