//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! <datadir>/keys + passphrase
//!     → wallet.rs (keystore import, unlock)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → transaction.rs (TxParams snapshot → contract call)
//!     → contract.rs (WRKChain Root ABI, event decoding)
//! ```
//!
//! The oracle core depends only on the traits in `ledger.rs`.
//!
//! # Security Constraints
//! - Never log private keys or passphrases
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod ledger;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use ledger::{HeaderSource, LedgerClient};
pub use transaction::TxParams;
pub use types::{BlockchainError, BlockchainResult, RawHeader, RegistrationEvent};
pub use wallet::Wallet;
