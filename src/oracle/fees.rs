//! Balance checks before paying for a registration or a record.

use alloy::primitives::{Address, U256};

use crate::error::{OracleError, OracleResult};

/// Tax charged by the WRKChain Root contract per call: 1 UND in the smallest unit.
pub const RECORD_TAX: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// What the operator is about to pay for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charge {
    /// Registration: the deposit read from the contract, plus the call's own tax.
    Register { deposit: U256 },
    /// One header record.
    Record,
}

impl Charge {
    fn action(&self) -> &'static str {
        match self {
            Charge::Register { .. } => "register",
            Charge::Record => "record",
        }
    }
}

/// Balance guard.
#[derive(Debug, Clone, Copy)]
pub struct FeeGuard {
    tax: U256,
    reserve: U256,
}

impl FeeGuard {
    /// Guard with the standard tax and an operational `reserve` kept on top of every charge.
    pub fn new(reserve: U256) -> Self {
        Self {
            tax: RECORD_TAX,
            reserve,
        }
    }

    /// Minimum balance needed for `charge`.
    pub fn required(&self, charge: Charge) -> U256 {
        let base = match charge {
            Charge::Register { deposit } => deposit.saturating_add(self.tax),
            Charge::Record => self.tax,
        };
        base.saturating_add(self.reserve)
    }

    /// Fail with `InsufficientFunds` unless `balance` covers `charge`.
    pub fn check(&self, account: Address, balance: U256, charge: Charge) -> OracleResult<()> {
        let required = self.required(charge);
        if balance < required {
            return Err(OracleError::InsufficientFunds {
                action: charge.action(),
                account,
                balance,
                required,
                shortfall: required - balance,
            });
        }
        Ok(())
    }
}

impl Default for FeeGuard {
    fn default() -> Self {
        Self::new(U256::ZERO)
    }
}
