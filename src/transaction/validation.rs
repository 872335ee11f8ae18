/// Validation logic for transactions separated from type definitions
use crate::error::ChainError;
use crate::transaction::types::{Transaction, SYSTEM_ACCOUNT};

impl Transaction {
    /// Stateless shape check run before a transaction enters the pending buffer.
    ///
    /// The ledger does not know whether `from` or `to` name real accounts;
    /// that is the caller's responsibility. The system account may send
    /// (notarization events) but never receive.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.from.is_none() {
            return Err(ChainError::InvalidTransaction(
                "Transaction sender is missing".to_string(),
            ));
        }

        match self.to {
            None => {
                return Err(ChainError::InvalidTransaction(
                    "Transaction receiver is missing".to_string(),
                ))
            }
            Some(SYSTEM_ACCOUNT) => {
                return Err(ChainError::InvalidTransaction(
                    "The system account cannot receive transfers".to_string(),
                ))
            }
            Some(_) => {}
        }

        if !self.amount.is_finite() {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount must be a finite number, got {}",
                self.amount
            )));
        }

        if self.amount < 0.0 {
            return Err(ChainError::InvalidTransaction(format!(
                "Amount cannot be negative, got {}",
                self.amount
            )));
        }

        Ok(())
    }
}
