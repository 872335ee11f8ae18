/// Transaction types for the notary ledger
use crate::crypto;
use crate::error::ChainError;
use chrono::{DateTime, Utc};

/// Identifier of a party in the surrounding application.
pub type AccountId = u64;

/// Sender id used for events recorded by the platform itself.
pub const SYSTEM_ACCOUNT: AccountId = 0;

/// A unilateral transfer intent submitted for notarization.
///
/// `from` and `to` are optional on the wire so a malformed request still
/// deserializes and can be rejected by [`Transaction::validate`] with a
/// descriptive error rather than a parse failure. `timestamp` has no default:
/// it is part of the digest, so whoever builds the transaction must fix it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub from: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    /// Opaque payload, hashed verbatim and never interpreted by the ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Transaction {
    /// New transaction stamped with the current time.
    pub fn new(from: AccountId, to: AccountId, amount: f64) -> Self {
        Transaction {
            from: Some(from),
            to: Some(to),
            amount,
            timestamp: Utc::now(),
            data: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Hex SHA-256 of the canonical encoding of this transaction.
    ///
    /// This is the single digest path: both [`hash_transaction`] and
    /// `Ledger::submit` return this value, so a stored transaction id can
    /// always be found again inside the chain.
    pub fn digest(&self) -> Result<String, ChainError> {
        crypto::digest(self)
    }
}

/// Digest a transaction without submitting it to any ledger.
pub fn hash_transaction(transaction: &Transaction) -> Result<String, ChainError> {
    transaction.digest()
}
