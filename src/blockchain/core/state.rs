use super::chain::Block;

/// Aggregate view over a chain, served to diagnostic callers.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChainStats {
    pub total_blocks: u64,
    pub height: u64,
    pub transactions: u64,
    pub notarized_amount: f64,
    pub difficulty: usize,
    pub pending: usize,
}

impl ChainStats {
    pub fn from_blocks(blocks: &[Block], difficulty: usize, pending: usize) -> Self {
        let transactions = blocks.iter().flat_map(|b| b.transactions.iter());

        Self {
            total_blocks: blocks.len() as u64,
            height: blocks.last().map_or(0, |b| b.index),
            transactions: transactions.clone().count() as u64,
            notarized_amount: transactions.map(|tx| tx.amount).sum(),
            difficulty,
            pending,
        }
    }
}
