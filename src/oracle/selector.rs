//! Choosing which header digests get committed.

use alloy::primitives::{Address, B256};

use crate::blockchain::RawHeader;
use crate::config::RecordConfig;

/// Which optional roots to copy from the WRKChain header. Fixed per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSelection {
    pub include_parent: bool,
    pub include_receipt: bool,
    pub include_tx: bool,
    pub include_state: bool,
}

/// One header as committed to the WRKChain Root contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRecord {
    pub chain_id: u64,
    pub height: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub receipt_root: B256,
    pub tx_root: B256,
    pub state_root: B256,
    pub sealer: Address,
}

impl FieldSelection {
    /// Copy enabled fields verbatim and zero-fill the rest.
    pub fn select(&self, chain_id: u64, header: &RawHeader, sealer: Address) -> HeaderRecord {
        let pick = |enabled: bool, value: B256| if enabled { value } else { B256::ZERO };

        HeaderRecord {
            chain_id,
            height: header.height,
            hash: header.hash,
            parent_hash: pick(self.include_parent, header.parent_hash),
            receipt_root: pick(self.include_receipt, header.receipt_root),
            tx_root: pick(self.include_tx, header.tx_root),
            state_root: pick(self.include_state, header.state_root),
            sealer,
        }
    }
}

impl From<&RecordConfig> for FieldSelection {
    fn from(config: &RecordConfig) -> Self {
        Self {
            include_parent: config.include_parent,
            include_receipt: config.include_receipt,
            include_tx: config.include_tx,
            include_state: config.include_state,
        }
    }
}
