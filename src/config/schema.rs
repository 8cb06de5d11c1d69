//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the oracle.
//! All types derive Serde traits for deserialization from config files, and every field has a
//! default so an empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Default UND Mainchain JSON-RPC endpoint for testnet.
pub const DEFAULT_MAINCHAIN_TESTNET_RPC: &str = "https://rpc-testnet.unification.io";

/// Default UND Mainchain JSON-RPC endpoint for mainnet.
pub const DEFAULT_MAINCHAIN_MAINNET_RPC: &str = "https://rpc-testnet.unification.io";

/// Root configuration for the oracle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Directory for the keystore and data. `~` and `$VARS` are expanded.
    pub datadir: String,

    /// Mainchain connection (registration and records are written here).
    pub mainchain: RpcConfig,

    /// WRKChain connection (headers are read from here).
    pub wrkchain: RpcConfig,

    /// WRKChain Root contract parameters.
    pub contract: ContractConfig,

    /// Header recording settings.
    pub record: RecordConfig,

    /// Fee and balance guard settings.
    pub fees: FeeConfig,

    /// Retry configuration for transient RPC failures.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            datadir: default_datadir(),
            mainchain: RpcConfig::default(),
            wrkchain: RpcConfig {
                rpc_url: String::new(),
                ..RpcConfig::default()
            },
            contract: ContractConfig::default(),
            record: RecordConfig::default(),
            fees: FeeConfig::default(),
            retries: RetryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// JSON-RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Primary JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover endpoints used for reads when the primary is unavailable.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_MAINCHAIN_TESTNET_RPC.to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 30,
        }
    }
}

/// WRKChain Root contract parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract address, fixed in Mainchain's genesis block.
    pub address: String,

    /// Storage slot holding the registration deposit.
    pub deposit_slot: u64,

    /// Pseudo gas limit attached to register and record transactions.
    pub gas_limit: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: "0x0000000000000000000000000000000000000087".to_string(),
            deposit_slot: 0,
            gas_limit: 240_000,
        }
    }
}

/// Which header fields get recorded, and how often.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Seconds between two records.
    pub frequency_secs: u64,

    pub include_parent: bool,
    pub include_receipt: bool,
    pub include_tx: bool,
    pub include_state: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            frequency_secs: 3600,
            include_parent: false,
            include_receipt: false,
            include_tx: false,
            include_state: false,
        }
    }
}

/// Fee guard settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Extra balance kept on top of every charge, in the smallest unit (decimal string).
    pub reserve_wei: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            reserve_wei: "0".to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Platform default data directory, before path expansion.
pub fn default_datadir() -> String {
    if cfg!(target_os = "macos") {
        "~/Library/WrkchainOracle".to_string()
    } else if cfg!(target_os = "windows") {
        "~/AppData/Roaming/WrkchainOracle".to_string()
    } else {
        "~/.wrkchain_oracle".to_string()
    }
}
