//! Proof-of-work mining
//!
//! The search is a plain linear scan over nonces starting at zero. It has no
//! iteration cap, no timeout and never yields: the caller blocks until a
//! nonce is found.

use crate::blockchain::Block;
use crate::error::ChainError;
use tracing::debug;

/// Leading zero hex characters a block hash needs when nothing else is configured.
pub const DEFAULT_DIFFICULTY: usize = 2;

/// Largest difficulty a 64-character hex digest can satisfy.
pub const MAX_DIFFICULTY: usize = crate::crypto::HEX_DIGEST_LEN;

/// True when the first `difficulty` characters of `hash` are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Search for a nonce whose block hash meets `difficulty`, then store the
/// winning nonce and hash on the block.
pub fn mine_block(mut block: Block, difficulty: usize) -> Result<Block, ChainError> {
    block.nonce = 0;
    let mut hash = block.calculate_hash()?;

    while !meets_difficulty(&hash, difficulty) {
        block.nonce += 1;
        hash = block.calculate_hash()?;
    }

    debug!(
        index = block.index,
        nonce = block.nonce,
        hash = %hash,
        "miner.found_nonce"
    );

    block.hash = hash;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    #[test]
    fn test_meets_difficulty() {
        assert!(meets_difficulty("00ab", 2));
        assert!(!meets_difficulty("0ab0", 2));
        assert!(meets_difficulty("abcd", 0));
        assert!(!meets_difficulty("0", 2));
    }

    #[test]
    fn test_mine_block_finds_valid_nonce() {
        let block = Block::new(1, "0".to_string(), vec![Transaction::new(7, 3, 500.0)]);
        let mined = mine_block(block, DEFAULT_DIFFICULTY).unwrap();

        assert!(mined.hash.starts_with("00"));
        assert_eq!(mined.hash, mined.calculate_hash().unwrap());
    }

    #[test]
    fn test_mine_block_restarts_from_zero() {
        let mut block = Block::new(1, "0".to_string(), vec![]);
        block.nonce = 1_000_000;
        let mined = mine_block(block, 1).unwrap();

        // 1/16 of hashes qualify, so a restart from zero finds one far below the stale nonce
        assert!(mined.nonce < 1_000_000);
    }
}
