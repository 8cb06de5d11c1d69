//! WRKChain Root contract bindings.
//!
//! The contract is pre-deployed at a fixed address in Mainchain's genesis block. Only the
//! calls and events the oracle uses are declared here.

use alloy::primitives::{address, Address, U256};
use alloy::rpc::types::Log;

use crate::blockchain::types::RegistrationEvent;

/// Address of the WRKChain Root contract on Mainchain.
pub const WRKCHAIN_ROOT_ADDRESS: Address = address!("0000000000000000000000000000000000000087");

/// Storage slot holding the registration deposit, in the smallest unit.
pub const DEPOSIT_STORAGE_SLOT: U256 = U256::ZERO;

/// Pseudo gas limit attached to every call. Never consumed by the contract, but counted
/// towards block gas usage.
pub const PSEUDO_GAS_LIMIT: u64 = 240_000;

alloy::sol! {
    /// WRKChain Root contract interface.
    interface WRKChainRoot {
        /// Emitted once per registered WRKChain.
        event RegisterWrkChain(uint256 indexed chainId, bytes32 genesisHash);

        /// Register a WRKChain with the addresses allowed to record its headers.
        function registerWrkChain(uint256 chainId, address[] authAddresses, bytes32 genesisHash) external payable;

        /// Record one WRKChain block header.
        function recordHeader(
            uint256 chainId,
            uint256 height,
            bytes32 hash,
            bytes32 parentHash,
            bytes32 receiptRoot,
            bytes32 txRoot,
            bytes32 stateRoot,
            address sealer
        ) external;
    }
}

/// Decode a raw log into a registration event, if it is one.
pub fn decode_registration(log: &Log) -> Option<RegistrationEvent> {
    let decoded = log.log_decode::<WRKChainRoot::RegisterWrkChain>().ok()?;
    let event = decoded.inner.data;

    Some(RegistrationEvent {
        chain_id: u64::try_from(event.chainId).ok()?,
        genesis_hash: event.genesisHash,
        tx_hash: log.transaction_hash.unwrap_or_default(),
    })
}
