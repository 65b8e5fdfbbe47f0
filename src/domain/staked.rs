//! Staked positions read from the staking contract.

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::token::Token;

/// A raw timelock entry as stored by the staking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timelock {
    /// Staked amount in base units.
    pub amount: U256,
    /// Unix timestamp (seconds) after which the amount can be withdrawn.
    pub expires_at: u64,
}

/// A stake that is still locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedStake {
    /// Index of the timelock in the contract.
    pub id: u64,
    pub amount: Decimal,
    pub expires: DateTime<Utc>,
}

/// Staked funds of one account, split by lock state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StakedSummary {
    /// Sum of all timelocks that have expired.
    pub unlocked_amount: Decimal,
    pub locked: Vec<LockedStake>,
}

impl StakedSummary {
    /// Fold `(index, timelock)` entries into a summary as of `now`.
    pub fn from_timelocks(
        entries: impl IntoIterator<Item = (u64, Timelock)>,
        token: &Token,
        now: DateTime<Utc>,
    ) -> Self {
        let mut summary = Self::default();
        for (id, timelock) in entries {
            let amount = token.from_base_units(timelock.amount);
            let expires = i64::try_from(timelock.expires_at)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);

            if expires < now {
                summary.unlocked_amount = summary.unlocked_amount.saturating_add(amount);
            } else {
                summary.locked.push(LockedStake {
                    id,
                    amount,
                    expires,
                });
            }
        }
        summary
    }

    /// Total staked amount, locked or not. Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.locked
            .iter()
            .fold(self.unlocked_amount, |sum, l| sum.saturating_add(l.amount))
    }
}
