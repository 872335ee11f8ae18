// Thin re-export module: implementation is in `blockchain/core.rs` so the
// block type, the ledger engine and chain validation can live side by side.

pub mod core;
pub use self::core::*;
