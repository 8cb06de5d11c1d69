//! Ledger seams used by the oracle core.
//!
//! The registration and record flows only ever talk to a ledger through these traits, so the
//! same code runs against an `alloy` node connection or an in-memory ledger in tests.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, RawHeader, RegistrationEvent};

/// Mainchain operations: state reads, event queries and transaction submission.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance of `account` at the latest block, in the smallest unit.
    async fn balance_at(&self, account: Address) -> BlockchainResult<U256>;

    /// Nonce of `account` including transactions still in the pool.
    async fn pending_nonce_at(&self, account: Address) -> BlockchainResult<u64>;

    /// Raw value of storage slot `slot` in `contract`.
    async fn storage_at(&self, contract: Address, slot: U256) -> BlockchainResult<U256>;

    /// `RegisterWrkChain` events emitted by `contract` for `chain_id`, from block 0 to pending.
    async fn registration_events(
        &self,
        contract: Address,
        chain_id: u64,
    ) -> BlockchainResult<Vec<RegistrationEvent>>;

    /// Sign and broadcast a transaction. Returns as soon as the node accepts it.
    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash>;
}

/// WRKChain operations needed by the poll loop.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// Network id reported by the WRKChain node.
    async fn network_id(&self) -> BlockchainResult<u64>;

    /// Header of the most recent block.
    async fn latest_header(&self) -> BlockchainResult<RawHeader>;
}
