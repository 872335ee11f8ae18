use crate::crypto;
use crate::error::ChainError;
use crate::mempool::Mempool;
use crate::miner::{mine_block, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

use super::state::ChainStats;
use super::validation::{find_fault, ChainFault};

/// Hash and previous-hash value carried by the genesis block.
pub const GENESIS_HASH: &str = "0";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
}

/// The fields a block hash commits to. `hash` is never part of its own input.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockContent<'a> {
    index: u64,
    timestamp: &'a DateTime<Utc>,
    transactions: &'a [Transaction],
    previous_hash: &'a str,
    nonce: u64,
}

impl Block {
    /// Unmined candidate stamped with the current time.
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        Block {
            index,
            timestamp: Utc::now(),
            transactions,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        }
    }

    pub fn genesis() -> Self {
        Block {
            index: 0,
            timestamp: Utc::now(),
            transactions: Vec::new(),
            previous_hash: GENESIS_HASH.to_string(),
            hash: GENESIS_HASH.to_string(),
            nonce: 0,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Digest of `{index, timestamp, transactions, previousHash, nonce}`.
    pub fn calculate_hash(&self) -> Result<String, ChainError> {
        crypto::digest(&BlockContent {
            index: self.index,
            timestamp: &self.timestamp,
            transactions: &self.transactions,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        })
    }
}

/// Where a notarized transaction ended up.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TransactionRecord {
    pub block_index: u64,
    pub transaction: Transaction,
}

/// Single-node append-only ledger.
///
/// Every successful [`Ledger::submit`] seals exactly one block. The engine is
/// synchronous and not internally locked; hosts that share it between threads
/// must hold one exclusive lock across each `submit` call.
#[derive(Debug, Clone)]
pub struct Ledger {
    blocks: Vec<Block>,
    difficulty: usize,
    mempool: Mempool,
    /// Transaction digest -> (block index, position in block), filled at sealing time.
    sealed: HashMap<String, (usize, usize)>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a ledger holding only the genesis block, at the default difficulty.
    pub fn new() -> Self {
        Ledger {
            blocks: vec![Block::genesis()],
            difficulty: DEFAULT_DIFFICULTY,
            mempool: Mempool::new(),
            sealed: HashMap::new(),
        }
    }

    /// Create a ledger with a custom fixed difficulty (`1..=64`).
    pub fn with_difficulty(difficulty: usize) -> Result<Self, ChainError> {
        if difficulty == 0 || difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "difficulty must be between 1 and {}, got {}",
                MAX_DIFFICULTY, difficulty
            )));
        }

        Ok(Ledger {
            difficulty,
            ..Self::new()
        })
    }

    /// Validate, digest, buffer and immediately seal `transaction` into a new
    /// block. Returns the transaction's own digest, not the block hash.
    ///
    /// A rejected transaction leaves both the chain and the pending buffer
    /// exactly as they were.
    pub fn submit(&mut self, transaction: Transaction) -> Result<String, ChainError> {
        if let Err(e) = transaction.validate() {
            warn!(error = %e, "ledger.transaction_rejected");
            return Err(e);
        }

        let digest = transaction.digest()?;
        self.mempool.add_transaction(transaction);

        if let Err(e) = self.mine() {
            self.mempool.remove_last();
            return Err(e);
        }

        Ok(digest)
    }

    /// Seal every pending transaction into one mined block. No-op when the
    /// pending buffer is empty.
    pub fn mine(&mut self) -> Result<(), ChainError> {
        if self.mempool.is_empty() {
            return Ok(());
        }

        let pending = self.mempool.get_all_transactions();
        let digests = pending
            .iter()
            .map(Transaction::digest)
            .collect::<Result<Vec<_>, _>>()?;

        let previous = self.latest_block();
        let candidate = Block::new(previous.index + 1, previous.hash.clone(), pending);

        let started = Instant::now();
        let block = mine_block(candidate, self.difficulty)?;

        info!(
            index = block.index,
            hash = %block.hash,
            nonce = block.nonce,
            transactions = block.transactions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ledger.block_sealed"
        );

        let position = self.blocks.len();
        for (slot, digest) in digests.into_iter().enumerate() {
            // a resubmitted transaction keeps pointing at its first block
            self.sealed.entry(digest).or_insert((position, slot));
        }

        self.blocks.push(block);
        self.mempool.clear();
        Ok(())
    }

    /// Copy of the full chain, genesis first.
    pub fn get_chain(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    /// Alias of [`Ledger::get_chain`] for diagnostic callers.
    pub fn get_blockchain_state(&self) -> Vec<Block> {
        self.get_chain()
    }

    /// Recheck every non-genesis block's hash and back-link.
    pub fn validate_chain(&self) -> bool {
        match self.first_fault() {
            None => true,
            Some(fault) => {
                warn!(fault = %fault, "ledger.validation_failed");
                false
            }
        }
    }

    /// The first integrity problem found by a full scan, if any.
    pub fn first_fault(&self) -> Option<ChainFault> {
        find_fault(&self.blocks)
    }

    pub fn hash_transaction(&self, transaction: &Transaction) -> Result<String, ChainError> {
        transaction.digest()
    }

    pub fn latest_block(&self) -> &Block {
        // never empty: construction pushes the genesis block
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block(&self, index: u64) -> Option<&Block> {
        self.blocks.get(usize::try_from(index).ok()?)
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the latest block.
    pub fn height(&self) -> u64 {
        self.latest_block().index
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn pending_len(&self) -> usize {
        self.mempool.len()
    }

    /// Locate a transaction by the digest `submit` returned for it.
    ///
    /// Digests are recorded when a block is sealed, so lookups never re-hash
    /// the chain.
    pub fn find_transaction(&self, digest: &str) -> Option<TransactionRecord> {
        let &(position, slot) = self.sealed.get(digest)?;
        let block = self.blocks.get(position)?;
        block.transactions.get(slot).map(|tx| TransactionRecord {
            block_index: block.index,
            transaction: tx.clone(),
        })
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats::from_blocks(&self.blocks, self.difficulty, self.mempool.len())
    }
}
