//! Blockchain RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain state (balances, nonces, storage, logs, latest header)
//! - Submit signed transactions through the primary endpoint
//! - Bound every call with the configured timeout

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::contract::{decode_registration, WRKChainRoot};
use crate::blockchain::ledger::{HeaderSource, LedgerClient};
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, RawHeader, RegistrationEvent, RpcConfig,
};
use crate::blockchain::wallet::Wallet;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Read providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Wallet-backed provider used for submissions, primary endpoint only.
    signer: Option<DynProvider>,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a read-only client for the configured endpoints.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(config: RpcConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url = parse_url(&config.rpc_url)?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::debug!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            signer: None,
            config,
            timeout_duration,
        })
    }

    /// Attach a wallet so the client can sign and submit transactions.
    pub fn with_wallet(mut self, wallet: &Wallet) -> BlockchainResult<Self> {
        let url = parse_url(&self.config.rpc_url)?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url);
        self.signer = Some(Arc::new(provider) as DynProvider);
        Ok(self)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Run `call` against each provider in turn until one answers within the timeout.
    async fn first_ok<T, E, F, Fut>(&self, op: &'static str, call: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut timed_out = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, op, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    timed_out += 1;
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                }
            }
        }

        if timed_out == self.providers.len() {
            return Err(BlockchainError::Timeout(self.config.rpc_timeout_secs));
        }
        Err(BlockchainError::Rpc(format!("All RPC providers failed: {}", op)))
    }
}

#[async_trait]
impl LedgerClient for BlockchainClient {
    async fn balance_at(&self, account: Address) -> BlockchainResult<U256> {
        self.first_ok("get_balance", |p| async move { p.get_balance(account).await })
            .await
    }

    async fn pending_nonce_at(&self, account: Address) -> BlockchainResult<u64> {
        self.first_ok("get_transaction_count", |p| async move {
            p.get_transaction_count(account).pending().await
        })
        .await
    }

    async fn storage_at(&self, contract: Address, slot: U256) -> BlockchainResult<U256> {
        self.first_ok("get_storage_at", |p| async move {
            p.get_storage_at(contract, slot).await
        })
        .await
    }

    async fn registration_events(
        &self,
        contract: Address,
        chain_id: u64,
    ) -> BlockchainResult<Vec<RegistrationEvent>> {
        let filter = Filter::new()
            .address(contract)
            .event_signature(WRKChainRoot::RegisterWrkChain::SIGNATURE_HASH)
            .topic1(B256::from(U256::from(chain_id)))
            .from_block(0u64)
            .to_block(BlockNumberOrTag::Pending);

        let logs = self
            .first_ok("get_logs", |p| {
                let filter = filter.clone();
                async move { p.get_logs(&filter).await }
            })
            .await?;

        Ok(logs.iter().filter_map(decode_registration).collect())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| BlockchainError::Wallet("No wallet attached to client".to_string()))?;

        match timeout(self.timeout_duration, signer.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            // Only a JSON-RPC error response proves the node refused the transaction
            Ok(Err(e)) if e.as_error_resp().is_some() => {
                Err(BlockchainError::Submission(e.to_string()))
            }
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }
}

#[async_trait]
impl HeaderSource for BlockchainClient {
    async fn network_id(&self) -> BlockchainResult<u64> {
        self.first_ok("get_chain_id", |p| async move { p.get_chain_id().await })
            .await
    }

    async fn latest_header(&self) -> BlockchainResult<RawHeader> {
        let block = self
            .first_ok("get_block_by_number", |p| async move {
                p.get_block_by_number(BlockNumberOrTag::Latest).await
            })
            .await?
            .ok_or_else(|| BlockchainError::NotFound("latest block".to_string()))?;

        let header = &block.header;
        Ok(RawHeader {
            height: header.number,
            hash: header.hash,
            parent_hash: header.parent_hash,
            receipt_root: header.receipts_root,
            tx_root: header.transactions_root,
            state_root: header.state_root,
        })
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("failover_urls", &self.config.failover_urls)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("can_sign", &self.signer.is_some())
            .finish()
    }
}

fn parse_url(raw: &str) -> BlockchainResult<url::Url> {
    raw.parse()
        .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RpcConfig {
        RpcConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 2,
        }
    }

    #[test]
    fn test_client_creation() {
        // Unreachable endpoints are only detected on first use
        let client = BlockchainClient::new(test_config()).unwrap();
        assert_eq!(client.providers.len(), 1);
        assert!(client.signer.is_none());
    }

    #[test]
    fn test_invalid_primary_url_rejected() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = BlockchainClient::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[test]
    fn test_invalid_failover_skipped() {
        let mut config = test_config();
        config.failover_urls = vec!["::bad::".to_string(), "http://127.0.0.1:2".to_string()];
        let client = BlockchainClient::new(config).unwrap();
        assert_eq!(client.providers.len(), 2);
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        let client = BlockchainClient::new(config).unwrap();

        // Both endpoints refuse connections
        let result = client.network_id().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_send_without_wallet() {
        let client = BlockchainClient::new(test_config()).unwrap();
        let err = client
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Wallet(_)));
    }
}
