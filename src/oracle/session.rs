//! Signing session bound to the WRKChain Root contract.

use alloy::primitives::{Address, U256};

use crate::blockchain::{TxParams, Wallet};

/// The operator's signing identity plus the parameters of its next transaction.
///
/// Mutated before every submission; each submission receives an immutable [`TxParams`]
/// snapshot so in-flight dispatches never observe later changes.
#[derive(Debug, Clone)]
pub struct SigningSession {
    wallet: Wallet,
    contract: Address,
    gas_limit: u64,
    nonce: Option<u64>,
    value: U256,
}

impl SigningSession {
    pub fn new(wallet: Wallet, contract: Address, gas_limit: u64) -> Self {
        Self {
            wallet,
            contract,
            gas_limit,
            nonce: None,
            value: U256::ZERO,
        }
    }

    /// Operator address; also the sealer recorded with each header.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Set nonce and value for the next transaction and snapshot the result.
    pub fn prepare(&mut self, nonce: u64, value: U256) -> TxParams {
        self.nonce = Some(nonce);
        self.value = value;
        TxParams {
            from: self.address(),
            to: self.contract,
            value,
            nonce,
            gas_limit: self.gas_limit,
        }
    }

    /// Nonce of the last prepared transaction.
    pub fn last_nonce(&self) -> Option<u64> {
        self.nonce
    }
}
