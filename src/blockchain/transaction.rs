//! Transaction parameter snapshots and call building.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;

/// Immutable parameters for one submission.
///
/// Handed by value to each dispatch so concurrent sends never share mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_limit: u64,
}

impl TxParams {
    /// Build the contract call transaction for `call`.
    pub fn build_call<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_value(self.value)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_input(call.abi_encode())
    }
}
