//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Ledger query from the poll loop or registration:
//!     → client.rs (per-call timeout, failover endpoints)
//!     → On transient failure: retries.rs (retry with backoff.rs delays)
//!     → Exhausted: error returned to the caller
//! ```

pub mod backoff;
pub mod retries;

pub use retries::retry_transient;
