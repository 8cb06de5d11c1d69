//! Shared utilities for integration testing: in-memory Mainchain and WRKChain ledgers.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use wrkoracle::blockchain::contract::{WRKChainRoot, WRKCHAIN_ROOT_ADDRESS};
use wrkoracle::blockchain::{
    BlockchainError, BlockchainResult, HeaderSource, LedgerClient, RawHeader, RegistrationEvent, Wallet,
};
use wrkoracle::config::RetryConfig;
use wrkoracle::oracle::{SigningSession, RECORD_TAX};

/// Well-known test private key (Anvil's first account).
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Mutable state behind [`MockMainchain`].
#[derive(Debug, Default)]
pub struct MainchainState {
    pub balance: U256,
    pub pending_nonce: u64,
    /// Value of the deposit storage slot.
    pub deposit: U256,
    pub events: Vec<RegistrationEvent>,
    pub sent: Vec<TransactionRequest>,
    /// Emit a `RegisterWrkChain` event when a registration is sent, like the contract does.
    pub emit_events: bool,
    /// Number of upcoming sends to reject.
    pub failing_sends: usize,
    /// Number of upcoming sends that time out after the node has accepted them.
    pub timed_out_sends: usize,
    /// Number of upcoming balance queries that fail with a transient error.
    pub flaky_balance: usize,
}

/// In-memory Mainchain. Sends are accepted but never mined, so the pending nonce stays put
/// unless a test moves it.
#[derive(Debug, Default)]
pub struct MockMainchain {
    pub state: Mutex<MainchainState>,
}

impl MockMainchain {
    pub fn new(balance: U256, pending_nonce: u64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MainchainState {
                balance,
                pending_nonce,
                deposit: und(1000),
                emit_events: true,
                ..Default::default()
            }),
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MainchainState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.with(|s| s.sent.clone())
    }

    /// Decoded `recordHeader` calls, in submission order.
    pub fn records(&self) -> Vec<(u64, WRKChainRoot::recordHeaderCall)> {
        self.sent()
            .iter()
            .filter_map(|tx| {
                let input = tx.input.input()?;
                let call = WRKChainRoot::recordHeaderCall::abi_decode(input).ok()?;
                Some((tx.nonce?, call))
            })
            .collect()
    }
}

#[async_trait]
impl LedgerClient for MockMainchain {
    async fn balance_at(&self, _account: Address) -> BlockchainResult<U256> {
        self.with(|s| {
            if s.flaky_balance > 0 {
                s.flaky_balance -= 1;
                return Err(BlockchainError::Rpc("connection reset by peer".into()));
            }
            Ok(s.balance)
        })
    }

    async fn pending_nonce_at(&self, _account: Address) -> BlockchainResult<u64> {
        Ok(self.with(|s| s.pending_nonce))
    }

    async fn storage_at(&self, contract: Address, slot: U256) -> BlockchainResult<U256> {
        assert_eq!(contract, WRKCHAIN_ROOT_ADDRESS);
        assert_eq!(slot, U256::ZERO);
        Ok(self.with(|s| s.deposit))
    }

    async fn registration_events(
        &self,
        contract: Address,
        chain_id: u64,
    ) -> BlockchainResult<Vec<RegistrationEvent>> {
        assert_eq!(contract, WRKCHAIN_ROOT_ADDRESS);
        Ok(self.with(|s| {
            s.events
                .iter()
                .filter(|e| e.chain_id == chain_id)
                .copied()
                .collect()
        }))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        self.with(|s| {
            if s.failing_sends > 0 {
                s.failing_sends -= 1;
                return Err(BlockchainError::Submission("replacement transaction underpriced".into()));
            }

            let tx_hash = B256::from(U256::from(s.sent.len() + 1));
            if s.timed_out_sends > 0 {
                s.timed_out_sends -= 1;
                s.sent.push(tx);
                return Err(BlockchainError::Timeout(30));
            }
            if s.emit_events {
                if let Some(call) = tx
                    .input
                    .input()
                    .and_then(|input| WRKChainRoot::registerWrkChainCall::abi_decode(input).ok())
                {
                    s.events.push(RegistrationEvent {
                        chain_id: call.chainId.to::<u64>(),
                        genesis_hash: call.genesisHash,
                        tx_hash,
                    });
                }
            }
            s.sent.push(tx);
            Ok(tx_hash)
        })
    }
}

/// In-memory WRKChain whose height grows by one per header fetch.
#[derive(Debug)]
pub struct MockWrkchain {
    pub network_id: u64,
    pub height: Mutex<u64>,
    /// Number of upcoming network id queries that fail with a transient error.
    pub flaky_network_id: Mutex<usize>,
}

impl MockWrkchain {
    pub fn new(network_id: u64, start_height: u64) -> Arc<Self> {
        Arc::new(Self {
            network_id,
            height: Mutex::new(start_height),
            flaky_network_id: Mutex::new(0),
        })
    }

    /// Header the mock serves at `height`.
    pub fn header_at(height: u64) -> RawHeader {
        let byte = (height % 251) as u8;
        RawHeader {
            height,
            hash: B256::repeat_byte(byte),
            parent_hash: B256::repeat_byte(byte.wrapping_add(1)),
            receipt_root: B256::repeat_byte(0xee),
            tx_root: B256::repeat_byte(0xdd),
            state_root: B256::repeat_byte(0xcc),
        }
    }
}

#[async_trait]
impl HeaderSource for MockWrkchain {
    async fn network_id(&self) -> BlockchainResult<u64> {
        let mut flaky = self.flaky_network_id.lock().unwrap();
        if *flaky > 0 {
            *flaky -= 1;
            return Err(BlockchainError::Timeout(30));
        }
        Ok(self.network_id)
    }

    async fn latest_header(&self) -> BlockchainResult<RawHeader> {
        let mut height = self.height.lock().unwrap();
        let header = Self::header_at(*height);
        *height += 1;
        Ok(header)
    }
}

/// `n` UND in the smallest unit.
pub fn und(n: u64) -> U256 {
    U256::from(n) * RECORD_TAX
}

pub fn operator_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

pub fn session() -> SigningSession {
    SigningSession::new(operator_wallet(), WRKCHAIN_ROOT_ADDRESS, 240_000)
}

/// Retries with delays short enough for tests.
pub fn fast_retries() -> RetryConfig {
    RetryConfig {
        enabled: true,
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}
