//! Transaction dispatch.
//!
//! Record submissions run as spawned tasks so a slow node never delays the next poll tick.
//! Each task reports a [`DispatchOutcome`] on an unbounded channel that the poll loop drains.
//! Receipts are not awaited; inclusion has to be monitored externally.

use alloy::primitives::{TxHash, U256};
use alloy::sol_types::SolCall;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::blockchain::contract::WRKChainRoot;
use crate::blockchain::{BlockchainError, BlockchainResult, LedgerClient, TxParams};
use crate::error::OracleResult;
use crate::observability::metrics;
use crate::oracle::selector::HeaderRecord;

/// How a background submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Accepted by the node.
    Sent(TxHash),
    /// Refused by the node; the nonce was not consumed.
    Rejected(String),
    /// Lost in transit or timed out; the node may still hold the transaction.
    Unknown(String),
}

impl SubmissionStatus {
    fn from_result(result: BlockchainResult<TxHash>) -> Self {
        match result {
            Ok(tx_hash) => Self::Sent(tx_hash),
            Err(e @ BlockchainError::Submission(_)) => Self::Rejected(e.to_string()),
            Err(e) => Self::Unknown(e.to_string()),
        }
    }
}

/// Result of one asynchronous submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub nonce: u64,
    /// WRKChain block height that was being recorded.
    pub height: u64,
    pub status: SubmissionStatus,
}

/// Submits transactions through a ledger client.
#[derive(Clone)]
pub struct Dispatcher {
    ledger: Arc<dyn LedgerClient>,
    outcomes: mpsc::UnboundedSender<DispatchOutcome>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end of its outcome channel.
    pub fn new(ledger: Arc<dyn LedgerClient>) -> (Self, mpsc::UnboundedReceiver<DispatchOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (Self { ledger, outcomes }, rx)
    }

    /// Submit `call` and wait for the node to accept it.
    pub async fn submit<C: SolCall>(&self, params: TxParams, call: &C) -> OracleResult<TxHash> {
        let result = self.ledger.send_transaction(params.build_call(call)).await;
        metrics::record_submission(result.is_ok());
        Ok(result?)
    }

    /// Submit a header record in the background.
    ///
    /// `next_attempt_in` is only used for reporting: a failed record is not retried until the
    /// next tick.
    pub fn dispatch_record(
        &self,
        params: TxParams,
        record: HeaderRecord,
        next_attempt_in: Duration,
    ) -> JoinHandle<()> {
        let ledger = self.ledger.clone();
        let outcomes = self.outcomes.clone();
        metrics::record_dispatched();

        tokio::spawn(async move {
            tracing::info!(
                chain_id = record.chain_id,
                height = record.height,
                hash = %record.hash,
                parent_hash = %record.parent_hash,
                receipt_root = %record.receipt_root,
                tx_root = %record.tx_root,
                state_root = %record.state_root,
                sealer = %record.sealer,
                nonce = params.nonce,
                "Sending record to WRKChain Root on Mainchain"
            );

            let result = ledger
                .send_transaction(params.build_call(&record_call(&record)))
                .await;
            metrics::record_submission(result.is_ok());

            match &result {
                Ok(tx_hash) => {
                    tracing::info!(tx_hash = %tx_hash, nonce = params.nonce, "RecordHeader tx sent");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        nonce = params.nonce,
                        height = record.height,
                        next_attempt_secs = next_attempt_in.as_secs(),
                        "Could not record WRKChain header"
                    );
                }
            }

            // The loop may already be gone during shutdown
            let _ = outcomes.send(DispatchOutcome {
                nonce: params.nonce,
                height: record.height,
                status: SubmissionStatus::from_result(result),
            });
        })
    }
}

/// ABI call for one header record.
pub fn record_call(record: &HeaderRecord) -> WRKChainRoot::recordHeaderCall {
    WRKChainRoot::recordHeaderCall {
        chainId: U256::from(record.chain_id),
        height: U256::from(record.height),
        hash: record.hash,
        parentHash: record.parent_hash,
        receiptRoot: record.receipt_root,
        txRoot: record.tx_root,
        stateRoot: record.state_root,
        sealer: record.sealer,
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("receiver_closed", &self.outcomes.is_closed())
            .finish()
    }
}
