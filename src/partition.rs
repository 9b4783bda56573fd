//! Partitioner: split a relation into contiguous blocks.

use crate::relation::{Block, Relation};

/// Split `relation` into contiguous blocks of at most `block_size` rows,
/// preserving order. The final block may be shorter. A non-positive
/// `block_size` yields no blocks rather than looping forever — callers
/// upstream should treat a non-feasible block size as overflow before
/// ever reaching the partitioner.
pub fn partition(relation: &Relation, block_size: i64) -> Vec<Block> {
    if block_size <= 0 || relation.is_empty() {
        return Vec::new();
    }
    relation
        .rows()
        .chunks(block_size as usize)
        .map(|chunk| Block::new(chunk.to_vec()))
        .collect()
}
