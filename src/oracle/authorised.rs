//! Addresses allowed to record headers for a registered WRKChain.

use alloy::primitives::Address;

use crate::error::{OracleError, OracleResult};

/// Ordered, duplicate-free set of authorised addresses. The operator always comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorisedSet {
    addresses: Vec<Address>,
}

impl AuthorisedSet {
    /// Build the set from the operator address and a comma separated list.
    ///
    /// Entries may omit the `0x` prefix and may be shorter than 40 hex digits, in which case
    /// they are left-padded with zeros. Empty entries are skipped.
    pub fn parse(operator: Address, list: &str) -> OracleResult<Self> {
        let mut set = Self {
            addresses: vec![operator],
        };

        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            set.insert(parse_address_lenient(entry)?);
        }

        Ok(set)
    }

    fn insert(&mut self, address: Address) {
        if !self.addresses.contains(&address) {
            self.addresses.push(address);
        }
    }

    /// The operator's own address.
    pub fn operator(&self) -> Address {
        self.addresses[0]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Never true: the operator is always present.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.addresses
    }

    pub fn into_vec(self) -> Vec<Address> {
        self.addresses
    }
}

/// Parse a hex address, left-padding short values to 20 bytes.
pub fn parse_address_lenient(raw: &str) -> OracleResult<Address> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if digits.is_empty() || digits.len() > 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(OracleError::Configuration(format!("Invalid address: {}", raw)));
    }

    let padded = format!("{:0>40}", digits);
    padded
        .parse()
        .map_err(|e| OracleError::Configuration(format!("Invalid address {}: {}", raw, e)))
}

/// Parse a full-length hex address, as required for the operator account.
pub fn parse_address_strict(raw: &str) -> OracleResult<Address> {
    raw.trim().parse().map_err(|_| {
        OracleError::Configuration(format!(
            "Account not in common hex format, e.g. 0xabd123...: {}",
            raw
        ))
    })
}
