//! Pending-transaction buffer
//!
//! Holds validated transactions that have not been sealed into a block yet.
//! The ledger drains it on every mining pass, so outside of `Ledger::submit`
//! it is normally empty.

use crate::transaction::Transaction;

#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Snapshot of the buffer in submission order.
    pub fn get_all_transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Drop the most recently added transaction, used to roll back a submit
    /// whose mining pass failed.
    pub fn remove_last(&mut self) -> Option<Transaction> {
        self.transactions.pop()
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
