//! Sibling id assignment.
//!
//! A block's id starts as its digest. Siblings with equal content would collide, so
//! the second, third, ... occurrence of a digest gets an id derived from the digest
//! and a per-digest duplicate count starting at 1. The result depends only on the
//! order of digests in the sibling list, so the same content yields the same ids on
//! every parse.

use std::collections::{HashMap, HashSet};

use super::types::{Block, BlockId};
use crate::parsing::digest::Domain;

pub(crate) fn assign_sibling_ids(children: &mut [Block]) {
    let mut seen: HashSet<BlockId> = HashSet::with_capacity(children.len());
    let mut duplicates: HashMap<BlockId, u64> = HashMap::new();

    for child in children.iter_mut() {
        let base = BlockId::from_digest(child.digest());
        let mut id = base;
        while !seen.insert(id) {
            let count = duplicates.entry(base).or_insert(0);
            *count += 1;
            id = BlockId::from_digest(base.digest().derive(Domain::DuplicateId, *count));
        }
        child.set_id(id);
    }
}
