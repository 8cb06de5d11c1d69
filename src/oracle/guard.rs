//! Registration guard.
//!
//! Whether a WRKChain is registered is decided solely by the `RegisterWrkChain` events on
//! Mainchain; nothing is cached locally. The check and the registration transaction are not
//! atomic, so two registrars racing past the guard both submit and the contract rejects the
//! second.

use alloy::primitives::Address;

use crate::blockchain::{LedgerClient, RegistrationEvent};
use crate::error::{OracleError, OracleResult};

/// Earliest registration event for `chain_id`, if any.
pub async fn find_registration(
    ledger: &dyn LedgerClient,
    contract: Address,
    chain_id: u64,
) -> OracleResult<Option<RegistrationEvent>> {
    let events = ledger.registration_events(contract, chain_id).await?;
    Ok(events.into_iter().find(|e| e.chain_id == chain_id))
}

/// Fail with `AlreadyRegistered` if `chain_id` has a registration event.
pub async fn ensure_unregistered(
    ledger: &dyn LedgerClient,
    contract: Address,
    chain_id: u64,
) -> OracleResult<()> {
    match find_registration(ledger, contract, chain_id).await? {
        Some(existing) => {
            tracing::info!(
                chain_id = existing.chain_id,
                genesis_hash = %existing.genesis_hash,
                tx_hash = %existing.tx_hash,
                "Found existing WRKChain registration"
            );
            Err(OracleError::AlreadyRegistered {
                chain_id: existing.chain_id,
                genesis_hash: existing.genesis_hash,
                tx_hash: existing.tx_hash,
            })
        }
        None => Ok(()),
    }
}
