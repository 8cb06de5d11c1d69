//! Ledger-facing types and error definitions.

use alloy::primitives::{TxHash, B256};
use thiserror::Error;

// Re-export RpcConfig from config module to avoid duplication
pub use crate::config::schema::RpcConfig;

/// Errors that can occur while talking to a ledger node or the local keystore.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered but the requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A response could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The node rejected or failed to relay a transaction.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Keystore lookup, decryption or import failed.
    #[error("Keystore error: {0}")]
    Keystore(String),
}

impl BlockchainError {
    /// Whether retrying the same call later can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_) | Self::Timeout(_) | Self::NotFound(_))
    }
}

/// Result type for ledger operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Header fields fetched from the WRKChain for one poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader {
    pub height: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub receipt_root: B256,
    pub tx_root: B256,
    pub state_root: B256,
}

/// A `RegisterWrkChain` event read back from the WRKChain Root contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationEvent {
    /// WRKChain network id the registration was made for.
    pub chain_id: u64,
    /// Genesis hash submitted at registration.
    pub genesis_hash: B256,
    /// Mainchain transaction that emitted the event.
    pub tx_hash: TxHash,
}
