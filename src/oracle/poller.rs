//! Header poll loop.
//!
//! ```text
//! Idle → Fetching → Checking Balance → Selecting Fields → Dispatching → Sleeping → Fetching …
//! ```
//!
//! Each tick drains the outcomes of earlier dispatches, checks the operator can pay for one
//! more record, fetches the latest WRKChain header, picks a nonce and hands the record to the
//! dispatcher without waiting for it. The loop ends on shutdown or on a fatal error such as
//! `InsufficientFunds`.

use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::blockchain::{HeaderSource, LedgerClient};
use crate::config::{RecordConfig, RetryConfig};
use crate::error::{format_und, OracleError, OracleResult};
use crate::observability::metrics;
use crate::oracle::dispatcher::{DispatchOutcome, Dispatcher, SubmissionStatus};
use crate::oracle::fees::{Charge, FeeGuard};
use crate::oracle::nonce::NonceSequencer;
use crate::oracle::selector::FieldSelection;
use crate::oracle::session::SigningSession;
use crate::resilience::retry_transient;

/// What one tick handed to the dispatcher.
#[derive(Debug)]
pub struct TickReport {
    pub nonce: u64,
    pub height: u64,
    /// The spawned submission; awaiting it is optional.
    pub handle: JoinHandle<()>,
}

/// Periodically records WRKChain headers on Mainchain.
pub struct Recorder {
    mainchain: Arc<dyn LedgerClient>,
    wrkchain: Arc<dyn HeaderSource>,
    session: SigningSession,
    selection: FieldSelection,
    fees: FeeGuard,
    retry: RetryConfig,
    frequency: Duration,
    sequencer: NonceSequencer,
    dispatcher: Dispatcher,
    outcomes: mpsc::UnboundedReceiver<DispatchOutcome>,
    network_id: Option<u64>,
}

impl Recorder {
    pub fn new(
        mainchain: Arc<dyn LedgerClient>,
        wrkchain: Arc<dyn HeaderSource>,
        session: SigningSession,
        record: &RecordConfig,
        fees: FeeGuard,
        retry: RetryConfig,
    ) -> Self {
        let (dispatcher, outcomes) = Dispatcher::new(mainchain.clone());
        Self {
            mainchain,
            wrkchain,
            session,
            selection: FieldSelection::from(record),
            fees,
            retry,
            frequency: Duration::from_secs(record.frequency_secs),
            sequencer: NonceSequencer::new(),
            dispatcher,
            outcomes,
            network_id: None,
        }
    }

    /// WRKChain network id, fetched once and cached.
    pub async fn network_id(&mut self) -> OracleResult<u64> {
        if let Some(id) = self.network_id {
            return Ok(id);
        }

        let wrkchain = self.wrkchain.as_ref();
        let id = retry_transient(&self.retry, "network_id", move || async move {
            wrkchain.network_id().await.map_err(OracleError::from)
        })
        .await?;

        tracing::info!(network_id = id, "WRKChain network id");
        self.network_id = Some(id);
        Ok(id)
    }

    /// Run until `shutdown` fires or a fatal error occurs.
    ///
    /// Transient failures abandon the current tick only; the next tick starts on schedule.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> OracleResult<()> {
        // An unreachable WRKChain at startup only delays the first record
        if let Err(e) = self.network_id().await {
            if !e.is_retryable() {
                return Err(e);
            }
            tracing::warn!(error = %e, "WRKChain not reachable yet, retrying on next tick");
        }
        tracing::info!(frequency_secs = self.frequency.as_secs(), "Start polling");

        loop {
            if shutdown_requested(&mut shutdown) {
                break;
            }

            match self.tick().await {
                Ok(report) => {
                    tracing::info!(
                        height = report.height,
                        nonce = report.nonce,
                        "Waiting for {} seconds",
                        self.frequency.as_secs()
                    );
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "Tick abandoned, retrying on next tick");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.frequency) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("Recorder stopped");
        Ok(())
    }

    /// One pass of the loop, without the sleep.
    pub async fn tick(&mut self) -> OracleResult<TickReport> {
        self.drain_outcomes();

        let chain_id = self.network_id().await?;
        let account = self.session.address();
        let mainchain = self.mainchain.as_ref();
        let wrkchain = self.wrkchain.as_ref();

        let balance = retry_transient(&self.retry, "balance_at", move || async move {
            mainchain.balance_at(account).await.map_err(OracleError::from)
        })
        .await?;
        metrics::record_balance(&balance);
        tracing::info!(account = %account, balance = %format_und(&balance), "Balance (UND)");
        self.fees.check(account, balance, Charge::Record)?;

        let header = retry_transient(&self.retry, "latest_header", move || async move {
            wrkchain.latest_header().await.map_err(OracleError::from)
        })
        .await?;

        let observed = retry_transient(&self.retry, "pending_nonce_at", move || async move {
            mainchain.pending_nonce_at(account).await.map_err(OracleError::from)
        })
        .await?;
        let nonce = self.sequencer.next(observed);
        tracing::debug!(observed, nonce, "Nonce selected");

        let record = self.selection.select(chain_id, &header, account);
        let params = self.session.prepare(nonce, U256::ZERO);
        let handle = self.dispatcher.dispatch_record(params, record, self.frequency);

        Ok(TickReport {
            nonce,
            height: header.height,
            handle,
        })
    }

    /// Apply finished dispatches: nonces of rejected records are handed out again.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            match &outcome.status {
                SubmissionStatus::Sent(_) => {}
                SubmissionStatus::Rejected(e) => {
                    tracing::warn!(
                        nonce = outcome.nonce,
                        height = outcome.height,
                        error = %e,
                        "Previous record rejected, reusing its nonce"
                    );
                    self.sequencer.release(outcome.nonce);
                }
                SubmissionStatus::Unknown(e) => {
                    tracing::warn!(
                        nonce = outcome.nonce,
                        height = outcome.height,
                        error = %e,
                        "Previous record may still be pending, not reusing its nonce"
                    );
                }
            }
        }
    }

    /// Nonce sequencer state, for inspection.
    pub fn sequencer(&self) -> &NonceSequencer {
        &self.sequencer
    }
}

fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    use broadcast::error::TryRecvError;
    !matches!(shutdown.try_recv(), Err(TryRecvError::Empty))
}
