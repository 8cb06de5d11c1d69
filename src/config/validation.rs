//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, frequency > 0)
//! - Validate addresses, URLs and amounts that are stored as strings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OracleConfig → Result<(), Vec<ValidationError>>
//! - Runs after CLI overrides are applied, before any command starts

use alloy::primitives::{Address, U256};
use std::net::SocketAddr;

use crate::config::schema::{OracleConfig, RpcConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint and collect all failures.
pub fn validate_config(config: &OracleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.datadir.trim().is_empty() {
        errors.push(ValidationError::new("datadir", "must not be empty"));
    }

    validate_rpc("mainchain", &config.mainchain, true, &mut errors);
    // The WRKChain endpoint is only needed by `record`, which checks for it itself.
    validate_rpc("wrkchain", &config.wrkchain, false, &mut errors);

    if config.contract.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contract.address",
            format!("'{}' is not a valid address", config.contract.address),
        ));
    }
    if config.contract.gas_limit == 0 {
        errors.push(ValidationError::new("contract.gas_limit", "must be greater than 0"));
    }

    if config.record.frequency_secs == 0 {
        errors.push(ValidationError::new("record.frequency_secs", "must be greater than 0"));
    }

    if config.fees.reserve_wei.parse::<U256>().is_err() {
        errors.push(ValidationError::new(
            "fees.reserve_wei",
            format!("'{}' is not a valid amount", config.fees.reserve_wei),
        ));
    }

    let retries = &config.retries;
    if retries.enabled && retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if retries.base_delay_ms > retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a valid socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rpc(section: &str, rpc: &RpcConfig, required: bool, errors: &mut Vec<ValidationError>) {
    if rpc.rpc_url.trim().is_empty() {
        if required {
            errors.push(ValidationError::new(format!("{}.rpc_url", section), "must not be empty"));
        }
    } else if rpc.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            format!("{}.rpc_url", section),
            format!("'{}' is not a valid URL", rpc.rpc_url),
        ));
    }

    for (i, failover) in rpc.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                format!("{}.failover_urls[{}]", section, i),
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }

    if rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            format!("{}.rpc_timeout_secs", section),
            "must be greater than 0",
        ));
    }
}
