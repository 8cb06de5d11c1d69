//! WRKChain identity from a geth-style genesis file.
//!
//! The genesis hash is the keccak hash of the RLP-encoded genesis header, built the way a geth
//! node builds block 0: state root from `alloc`, empty transaction/receipt/ommer roots, and the
//! fork-dependent fields of whichever forks are already active at genesis.

use alloy::consensus::constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH};
use alloy::consensus::Header;
use alloy::genesis::Genesis;
use alloy::primitives::{b256, B256, B64};
use alloy::trie::root::state_root_ref_unhashed;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base fee of the first London block, in the smallest unit.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Gas limit geth assumes when the genesis file leaves it at zero.
pub const DEFAULT_GENESIS_GAS_LIMIT: u64 = 4_712_388;

/// `sha256("")`, the requests hash of a block without execution-layer requests.
const EMPTY_REQUESTS_HASH: B256 =
    b256!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");

/// Errors reading a genesis file.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Failed to read genesis file {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Invalid genesis file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid genesis file: base fee {0} does not fit in 64 bits")]
    BaseFee(u128),
}

/// Identifies a WRKChain on the WRKChain Root contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainIdentity {
    /// `config.chainId` of the genesis file.
    pub network_id: u64,
    /// Hash of the genesis block header.
    pub genesis_hash: B256,
}

impl ChainIdentity {
    /// Read a genesis file and derive the identity it describes.
    pub fn from_genesis_file(path: &Path) -> Result<Self, GenesisError> {
        let raw = std::fs::read_to_string(path).map_err(|e| GenesisError::Io(path.to_path_buf(), e))?;
        Self::from_genesis_json(&raw)
    }

    /// Derive the identity from the genesis JSON text.
    pub fn from_genesis_json(raw: &str) -> Result<Self, GenesisError> {
        let genesis: Genesis = serde_json::from_str(raw)?;
        Self::from_genesis(&genesis)
    }

    pub fn from_genesis(genesis: &Genesis) -> Result<Self, GenesisError> {
        Ok(Self {
            network_id: genesis.config.chain_id,
            genesis_hash: genesis_header(genesis)?.hash_slow(),
        })
    }
}

/// Build the genesis block header.
pub fn genesis_header(genesis: &Genesis) -> Result<Header, GenesisError> {
    let config = &genesis.config;
    let number = genesis.number.unwrap_or_default();
    let timestamp = genesis.timestamp;

    let base_fee_per_gas = if config.is_london_active_at_block(number) {
        let fee = genesis.base_fee_per_gas.unwrap_or(INITIAL_BASE_FEE as u128);
        Some(u64::try_from(fee).map_err(|_| GenesisError::BaseFee(fee))?)
    } else {
        None
    };

    let shanghai = config.is_shanghai_active_at_block_and_timestamp(number, timestamp);
    let cancun = config.is_cancun_active_at_block_and_timestamp(number, timestamp);
    let prague = config.is_london_active_at_block(number)
        && config.prague_time.is_some_and(|t| t <= timestamp);

    let gas_limit = if genesis.gas_limit == 0 {
        DEFAULT_GENESIS_GAS_LIMIT
    } else {
        genesis.gas_limit
    };

    Ok(Header {
        parent_hash: genesis.parent_hash.unwrap_or_default(),
        ommers_hash: EMPTY_OMMER_ROOT_HASH,
        beneficiary: genesis.coinbase,
        state_root: state_root_ref_unhashed(&genesis.alloc),
        transactions_root: EMPTY_ROOT_HASH,
        receipts_root: EMPTY_ROOT_HASH,
        difficulty: genesis.difficulty,
        number,
        gas_limit,
        timestamp,
        extra_data: genesis.extra_data.clone(),
        mix_hash: genesis.mix_hash,
        nonce: B64::from(genesis.nonce),
        base_fee_per_gas,
        withdrawals_root: shanghai.then_some(EMPTY_ROOT_HASH),
        blob_gas_used: cancun.then(|| genesis.blob_gas_used.unwrap_or_default()),
        excess_blob_gas: cancun.then(|| genesis.excess_blob_gas.unwrap_or_default()),
        parent_beacon_block_root: cancun.then_some(B256::ZERO),
        requests_hash: prague.then_some(EMPTY_REQUESTS_HASH),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIQUE_GENESIS: &str = r#"{
        "config": {
            "chainId": 42,
            "homesteadBlock": 0,
            "eip150Block": 0,
            "eip155Block": 0,
            "eip158Block": 0,
            "byzantiumBlock": 0,
            "clique": { "period": 5, "epoch": 30000 }
        },
        "nonce": "0x0",
        "timestamp": "0x5c9a4b42",
        "extraData": "0x0000000000000000000000000000000000000000000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb922660000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
        "gasLimit": "0x47b760",
        "difficulty": "0x1",
        "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "coinbase": "0x0000000000000000000000000000000000000000",
        "alloc": {
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266": { "balance": "0x200000000000000000000000000000000000000000000000000000000000000" }
        }
    }"#;

    /// Ethereum mainnet block 0 without its alloc; the state root is patched in by the test.
    const MAINNET_GENESIS: &str = r#"{
        "config": { "chainId": 1 },
        "nonce": "0x42",
        "timestamp": "0x0",
        "extraData": "0x11bbe8db4e347b4e8c937c1c8370e4b5ed33adb3db69cbdb7a38e1e50b1b82fa",
        "gasLimit": "0x1388",
        "difficulty": "0x400000000",
        "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "coinbase": "0x0000000000000000000000000000000000000000",
        "alloc": {}
    }"#;

    const LONDON_GENESIS: &str = r#"{
        "config": { "chainId": 1337, "berlinBlock": 0, "londonBlock": 0 },
        "nonce": "0x0",
        "timestamp": "0x0",
        "extraData": "0x",
        "gasLimit": "0x1c9c380",
        "difficulty": "0x0",
        "mixHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "coinbase": "0x0000000000000000000000000000000000000000",
        "alloc": {}
    }"#;

    fn parse(raw: &str) -> Genesis {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_network_id_from_config() {
        let identity = ChainIdentity::from_genesis_json(CLIQUE_GENESIS).unwrap();
        assert_eq!(identity.network_id, 42);
        assert_ne!(identity.genesis_hash, B256::ZERO);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = ChainIdentity::from_genesis_json(CLIQUE_GENESIS).unwrap();
        let b = ChainIdentity::from_genesis_json(CLIQUE_GENESIS).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_covers_extra_data() {
        let mut genesis = parse(CLIQUE_GENESIS);
        let before = ChainIdentity::from_genesis(&genesis).unwrap();

        genesis.extra_data = vec![0xde, 0xad].into();
        let after = ChainIdentity::from_genesis(&genesis).unwrap();
        assert_ne!(before.genesis_hash, after.genesis_hash);
        assert_eq!(before.network_id, after.network_id);
    }

    #[test]
    fn test_state_root_from_alloc() {
        let mut genesis = parse(CLIQUE_GENESIS);
        let header = genesis_header(&genesis).unwrap();
        assert_ne!(header.state_root, EMPTY_ROOT_HASH);

        genesis.alloc.clear();
        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.state_root, EMPTY_ROOT_HASH);
    }

    #[test]
    fn test_pre_london_header_shape() {
        let header = genesis_header(&parse(CLIQUE_GENESIS)).unwrap();
        assert_eq!(header.number, 0);
        assert_eq!(header.ommers_hash, EMPTY_OMMER_ROOT_HASH);
        assert_eq!(header.transactions_root, EMPTY_ROOT_HASH);
        assert_eq!(header.receipts_root, EMPTY_ROOT_HASH);
        assert_eq!(header.gas_limit, 0x47b760);
        assert!(header.base_fee_per_gas.is_none());
        assert!(header.withdrawals_root.is_none());
    }

    #[test]
    fn test_london_at_genesis_sets_base_fee() {
        let mut genesis = parse(CLIQUE_GENESIS);
        genesis.config.berlin_block = Some(0);
        genesis.config.london_block = Some(0);

        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.base_fee_per_gas, Some(INITIAL_BASE_FEE));

        genesis.base_fee_per_gas = Some(7);
        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.base_fee_per_gas, Some(7));
    }

    #[test]
    fn test_shanghai_and_cancun_fields() {
        let mut genesis = parse(CLIQUE_GENESIS);
        genesis.config.london_block = Some(0);
        genesis.config.shanghai_time = Some(0);
        genesis.config.cancun_time = Some(0);

        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.withdrawals_root, Some(EMPTY_ROOT_HASH));
        assert_eq!(header.blob_gas_used, Some(0));
        assert_eq!(header.excess_blob_gas, Some(0));
        assert_eq!(header.parent_beacon_block_root, Some(B256::ZERO));
        assert!(header.requests_hash.is_none());
    }

    #[test]
    fn test_mainnet_block_zero_hash() {
        let mut header = genesis_header(&parse(MAINNET_GENESIS)).unwrap();
        assert_eq!(header.state_root, EMPTY_ROOT_HASH);

        header.state_root = b256!("d7f8974fb5ac78d9ac099b9ad5018bedc2ce0a72dad1827a1709da30580f0544");
        assert_eq!(
            header.hash_slow(),
            b256!("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3")
        );
    }

    #[test]
    fn test_clique_genesis_hash() {
        let header = genesis_header(&parse(CLIQUE_GENESIS)).unwrap();
        assert_eq!(
            header.state_root,
            b256!("5545e0d79bf941d485ed8c094fd0b8565d515979fb8627b38b4bc49574158d06")
        );

        let identity = ChainIdentity::from_genesis_json(CLIQUE_GENESIS).unwrap();
        assert_eq!(
            identity.genesis_hash,
            b256!("99b55a71d49944f6f4870aef58689a562a4e87c2389b96b2c78a24dc01b64036")
        );
    }

    #[test]
    fn test_london_genesis_hash() {
        let identity = ChainIdentity::from_genesis_json(LONDON_GENESIS).unwrap();
        assert_eq!(identity.network_id, 1337);
        assert_eq!(
            identity.genesis_hash,
            b256!("1a33392c3b77b01d6046d9bcb42638cf69cced478254e6b80107860b6f8fe1d9")
        );
    }

    #[test]
    fn test_shanghai_genesis_hash() {
        let mut genesis = parse(LONDON_GENESIS);
        genesis.config.shanghai_time = Some(0);

        let identity = ChainIdentity::from_genesis(&genesis).unwrap();
        assert_eq!(
            identity.genesis_hash,
            b256!("c3efce81cd2529a782cf7071ad35e44c87b40aa73cedfea7343a0f19b6fbf03b")
        );
    }

    #[test]
    fn test_prague_requests_hash() {
        let mut genesis = parse(LONDON_GENESIS);
        genesis.config.shanghai_time = Some(0);
        genesis.config.cancun_time = Some(0);
        genesis.config.prague_time = Some(0);
        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.requests_hash, Some(EMPTY_REQUESTS_HASH));

        // Scheduled later than genesis
        genesis.config.prague_time = Some(10);
        assert!(genesis_header(&genesis).unwrap().requests_hash.is_none());

        // Never without London
        genesis.config.london_block = None;
        genesis.config.prague_time = Some(0);
        assert!(genesis_header(&genesis).unwrap().requests_hash.is_none());
    }

    #[test]
    fn test_zero_gas_limit_defaults() {
        let mut genesis = parse(CLIQUE_GENESIS);
        genesis.gas_limit = 0;
        let header = genesis_header(&genesis).unwrap();
        assert_eq!(header.gas_limit, DEFAULT_GENESIS_GAS_LIMIT);
    }

    #[test]
    fn test_invalid_json() {
        let err = ChainIdentity::from_genesis_json("{ not json").unwrap_err();
        assert!(matches!(err, GenesisError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ChainIdentity::from_genesis_file(Path::new("/no/such/genesis.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/genesis.json"));
    }
}
