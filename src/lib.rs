//! Microloan notary ledger - an in-process proof-of-work ledger that
//! notarizes loan funding, repayment and request events
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger engine and chain validation
//! - [`transaction`] - Transaction type, validation and loan event payloads
//! - [`mempool`] - Pending-transaction buffer
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work nonce search
//!
//! ## Cryptography
//! - [`crypto`] - Canonical serialization and SHA-256 digests
//!
//! ## Integration
//! - `api` - HTTP surface (feature `api`)
//! - `cli` - Helpers for the command-line binaries (feature `cli`)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! The ledger keeps no global state: construct a [`blockchain::Ledger`] once
//! and hand it (or a lock around it) to whatever needs notarization.

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "cli")]
pub mod cli;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
