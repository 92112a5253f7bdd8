use std::fmt;

use alloy::{network::Ethereum, providers::RootProvider};

pub type EthereumClient = RootProvider<Ethereum>;

/// Inclusive span of block numbers processed in one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    /// Computes the next chunk to process, bounded by the chain head and the
    /// configured chunk size. Returns `None` when `from` is past the head,
    /// which means the indexer is caught up and should idle.
    pub fn next_chunk(from: u64, height: u64, max_chunk_size: u64) -> Option<Self> {
        if from > height {
            return None;
        }
        let to = height.min(from.saturating_add(max_chunk_size.saturating_sub(1)));
        Some(Self { from, to })
    }

    /// Number of blocks covered, inclusive of both ends.
    pub fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_is_bounded_by_max_size() {
        let range = BlockRange::next_chunk(1, 1_000, 100).unwrap();
        assert_eq!(range, BlockRange { from: 1, to: 100 });
        assert_eq!(range.block_count(), 100);
    }

    #[test]
    fn chunk_is_bounded_by_chain_head() {
        let range = BlockRange::next_chunk(1, 50, 100).unwrap();
        assert_eq!(range, BlockRange { from: 1, to: 50 });
    }

    #[test]
    fn caught_up_yields_no_chunk() {
        assert!(BlockRange::next_chunk(201, 150, 100).is_none());
        assert!(BlockRange::next_chunk(51, 50, 100).is_none());
    }

    #[test]
    fn single_block_head() {
        let range = BlockRange::next_chunk(50, 50, 100).unwrap();
        assert_eq!(range, BlockRange { from: 50, to: 50 });
        assert_eq!(range.block_count(), 1);
    }

    #[test]
    fn chunk_bounds_hold_for_many_inputs() {
        for from in 1..=300u64 {
            for height in [1, 50, 99, 100, 101, 250] {
                if let Some(range) = BlockRange::next_chunk(from, height, 100) {
                    assert!(range.block_count() <= 100);
                    assert!(range.to <= height);
                    assert_eq!(range.from, from);
                }
            }
        }
    }
}
