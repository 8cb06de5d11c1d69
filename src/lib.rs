//! WRKChain Oracle library.
//!
//! Registers a WRKChain on the WRKChain Root contract of UND Mainchain, then periodically
//! records the WRKChain's latest block header hashes there.

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod oracle;
pub mod resilience;

pub use config::schema::OracleConfig;
pub use error::{OracleError, OracleResult};
pub use lifecycle::Shutdown;
