//! One-shot WRKChain registration.

use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;

use crate::blockchain::contract::WRKChainRoot;
use crate::blockchain::LedgerClient;
use crate::config::RetryConfig;
use crate::error::{format_und, OracleError, OracleResult};
use crate::observability::metrics;
use crate::oracle::authorised::AuthorisedSet;
use crate::oracle::dispatcher::Dispatcher;
use crate::oracle::fees::{Charge, FeeGuard};
use crate::oracle::genesis::ChainIdentity;
use crate::oracle::guard::ensure_unregistered;
use crate::oracle::session::SigningSession;
use crate::resilience::retry_transient;

/// What a successful registration submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub identity: ChainIdentity,
    pub authorised: Vec<Address>,
    pub deposit: U256,
    pub nonce: u64,
    pub tx_hash: TxHash,
}

/// Registers a WRKChain on the WRKChain Root contract.
pub struct Registrar {
    ledger: Arc<dyn LedgerClient>,
    dispatcher: Dispatcher,
    session: SigningSession,
    fees: FeeGuard,
    retry: RetryConfig,
    deposit_slot: U256,
}

impl Registrar {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        session: SigningSession,
        fees: FeeGuard,
        retry: RetryConfig,
        deposit_slot: U256,
    ) -> Self {
        // Registration is awaited directly; the outcome channel stays unused.
        let (dispatcher, _) = Dispatcher::new(ledger.clone());
        Self {
            ledger,
            dispatcher,
            session,
            fees,
            retry,
            deposit_slot,
        }
    }

    /// Run the guard and fee checks, then submit the registration.
    pub async fn register(
        &mut self,
        identity: ChainIdentity,
        authorised: &AuthorisedSet,
    ) -> OracleResult<Registration> {
        let account = self.session.address();
        if authorised.operator() != account {
            return Err(OracleError::Configuration(format!(
                "Authorised set must start with the operator {}",
                account
            )));
        }

        let contract = self.session.contract();
        let ledger = self.ledger.as_ref();

        let balance = retry_transient(&self.retry, "balance_at", move || async move {
            ledger.balance_at(account).await.map_err(OracleError::from)
        })
        .await?;
        metrics::record_balance(&balance);
        tracing::info!(account = %account, balance = %format_und(&balance), "Balance (UND)");

        let chain_id = identity.network_id;
        retry_transient(&self.retry, "registration_events", move || async move {
            ensure_unregistered(ledger, contract, chain_id).await
        })
        .await?;

        let slot = self.deposit_slot;
        let deposit = retry_transient(&self.retry, "storage_at", move || async move {
            ledger.storage_at(contract, slot).await.map_err(OracleError::from)
        })
        .await?;
        tracing::info!(deposit = %deposit, deposit_und = %format_und(&deposit), "Registration deposit");

        self.fees.check(account, balance, Charge::Register { deposit })?;

        let nonce = retry_transient(&self.retry, "pending_nonce_at", move || async move {
            ledger.pending_nonce_at(account).await.map_err(OracleError::from)
        })
        .await?;
        tracing::info!(nonce, "Pending nonce");

        let params = self.session.prepare(nonce, deposit);
        let call = WRKChainRoot::registerWrkChainCall {
            chainId: U256::from(identity.network_id),
            authAddresses: authorised.as_slice().to_vec(),
            genesisHash: identity.genesis_hash,
        };
        let tx_hash = self.dispatcher.submit(params, &call).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            network_id = identity.network_id,
            genesis_hash = %identity.genesis_hash,
            "RegisterWrkChain tx sent"
        );

        Ok(Registration {
            identity,
            authorised: authorised.as_slice().to_vec(),
            deposit,
            nonce,
            tx_hash,
        })
    }
}
