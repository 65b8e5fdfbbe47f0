//! ERC-20 allowance sufficiency.
//!
//! Allowance is tracked as a flag rather than an exact amount: approvals are
//! always requested for the maximum value, and anything at or above a quarter
//! of it counts as "effectively unlimited". Spending lowers the on-chain
//! allowance slightly, so comparing against the exact maximum would force a
//! re-approval after the first stake.

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::Serialize;

/// Threshold at or above which an allowance is considered sufficient.
///
/// Equal to `U256::MAX / 4`.
#[must_use]
pub fn sufficiency_threshold() -> U256 {
    U256::MAX >> 2
}

/// The (owner, token, spender) triple an allowance is read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub owner: Address,
    pub token: Address,
    pub spender: Address,
}

/// Result of an allowance check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceStatus {
    /// No owner is connected, or the first query has not completed.
    #[default]
    Unknown,
    Sufficient,
    Insufficient,
}

impl AllowanceStatus {
    /// Classify an on-chain allowance amount.
    #[must_use]
    pub fn from_amount(amount: U256) -> Self {
        if amount >= sufficiency_threshold() {
            Self::Sufficient
        } else {
            Self::Insufficient
        }
    }

    #[must_use]
    pub const fn is_sufficient(self) -> bool {
        matches!(self, Self::Sufficient)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Sufficient => "sufficient",
            Self::Insufficient => "insufficient",
        }
    }
}

impl fmt::Display for AllowanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
