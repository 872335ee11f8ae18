use super::chain::Block;

/// An integrity problem found while scanning a chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainFault {
    #[error("block {index}: stored hash does not match its content")]
    HashMismatch { index: u64 },
    #[error("block {index}: previous hash does not match the preceding block")]
    BrokenLink { index: u64 },
}

/// Scan blocks `1..` for the first hash or link fault. The genesis block is
/// taken as valid and never checked. A block whose content cannot be
/// re-serialized counts as a hash mismatch.
pub fn find_fault(blocks: &[Block]) -> Option<ChainFault> {
    for pair in blocks.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        match current.calculate_hash() {
            Ok(hash) if hash == current.hash => {}
            _ => return Some(ChainFault::HashMismatch { index: current.index }),
        }

        if current.previous_hash != previous.hash {
            return Some(ChainFault::BrokenLink { index: current.index });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::mine_block;
    use crate::transaction::Transaction;

    fn mined_chain(len: u64) -> Vec<Block> {
        let mut blocks = vec![Block::genesis()];
        for i in 1..len {
            let previous = blocks.last().unwrap().hash.clone();
            let block = Block::new(i, previous, vec![Transaction::new(i, i + 1, 1.0)]);
            blocks.push(mine_block(block, 1).unwrap());
        }
        blocks
    }

    #[test]
    fn test_empty_and_genesis_only_chains_are_valid() {
        assert_eq!(find_fault(&[]), None);
        assert_eq!(find_fault(&[Block::genesis()]), None);
    }

    #[test]
    fn test_honest_chain_has_no_fault() {
        assert_eq!(find_fault(&mined_chain(5)), None);
    }

    #[test]
    fn test_forged_hash_reported() {
        let mut blocks = mined_chain(4);
        blocks[3].hash = "00".repeat(32);
        assert_eq!(find_fault(&blocks), Some(ChainFault::HashMismatch { index: 3 }));
    }

    #[test]
    fn test_first_fault_wins() {
        let mut blocks = mined_chain(4);
        blocks[1].nonce += 1;
        blocks[3].nonce += 1;
        assert_eq!(find_fault(&blocks), Some(ChainFault::HashMismatch { index: 1 }));
    }
}
