use std::fmt;

/// Counters describing how much work one parse did and how much it reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub runs_total: usize,
    /// Runs walked one by one by the builder.
    pub runs_visited: usize,
    /// Runs jumped over because a whole container was reused.
    pub runs_skipped: usize,
    pub leaf_digests: usize,
    pub container_digests: usize,
    pub leaf_hits: usize,
    pub subtree_hits: usize,
    /// Blocks constructed from scratch (leaves and containers).
    pub blocks_built: usize,
    /// The whole previous document was returned unchanged.
    pub document_reused: bool,
}

impl ParseStats {
    pub fn hits(&self) -> usize {
        self.leaf_hits + self.subtree_hits
    }
}

impl fmt::Display for ParseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.document_reused {
            return write!(f, "runs: {} (document reused)", self.runs_total);
        }
        write!(
            f,
            "runs: {} visited, {} skipped of {}; digests: {} leaf, {} container; \
             hits: {} leaf, {} subtree; built: {}",
            self.runs_visited,
            self.runs_skipped,
            self.runs_total,
            self.leaf_digests,
            self.container_digests,
            self.leaf_hits,
            self.subtree_hits,
            self.blocks_built
        )
    }
}
