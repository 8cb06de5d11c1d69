//! Top-level error taxonomy.
//!
//! Guards and flows return these to the runner in `main`, which decides between retrying,
//! logging and exiting.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, B256, U256};
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::oracle::genesis::GenesisError;

/// Everything that can stop or interrupt the oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Missing or invalid flag, file, key or genesis. Never retried.
    #[error("{0}")]
    Configuration(String),

    /// A `RegisterWrkChain` event already exists for this network id.
    #[error("WRKChain {chain_id} already registered with genesis hash {genesis_hash} in tx {tx_hash}")]
    AlreadyRegistered {
        chain_id: u64,
        genesis_hash: B256,
        tx_hash: TxHash,
    },

    /// The operator cannot pay for the next action.
    #[error(
        "Not enough UND to {action}: account {account} has {} UND, needs {} UND ({} UND short)",
        format_und(.balance),
        format_und(.required),
        format_und(.shortfall)
    )]
    InsufficientFunds {
        action: &'static str,
        account: Address,
        balance: U256,
        required: U256,
        shortfall: U256,
    },

    /// Ledger query failed.
    #[error(transparent)]
    Rpc(BlockchainError),

    /// The node refused a transaction.
    #[error("Submission failed: {0}")]
    Submission(String),
}

impl OracleError {
    /// Transient failures worth another attempt after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rpc(e) if e.is_transient())
    }

    /// Failures that must stop the process.
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable() && !matches!(self, Self::Submission(_))
    }
}

impl From<BlockchainError> for OracleError {
    fn from(e: BlockchainError) -> Self {
        match e {
            BlockchainError::Wallet(msg) | BlockchainError::Keystore(msg) => Self::Configuration(msg),
            BlockchainError::Submission(msg) => Self::Submission(msg),
            other => Self::Rpc(other),
        }
    }
}

impl From<ConfigError> for OracleError {
    fn from(e: ConfigError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<GenesisError> for OracleError {
    fn from(e: GenesisError) -> Self {
        Self::Configuration(e.to_string())
    }
}

/// Result type for oracle flows.
pub type OracleResult<T> = Result<T, OracleError>;

/// Render an amount in the smallest unit as UND, without trailing zeros.
pub fn format_und(amount: &U256) -> String {
    let formatted = format_ether(*amount);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => formatted,
    }
}
