//! Staked position reader.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{Address, StakedSummary, Token};
use crate::port::StakingContract;

/// Upper bound on timelock entries read per account.
pub const MAX_TIMELOCKS: u64 = 256;

/// Reads every timelock an account holds in the staking contract.
pub struct StakedReader {
    staking: Arc<dyn StakingContract>,
    stake_token: Token,
}

impl StakedReader {
    #[must_use]
    pub fn new(staking: Arc<dyn StakingContract>, stake_token: Token) -> Self {
        Self {
            staking,
            stake_token,
        }
    }

    /// Summarize the stakes of `account` as of `now`.
    ///
    /// Entries are read by index from zero until the contract reports no
    /// entry. A failed read ends the scan with what was read so far.
    pub async fn read(&self, account: Address, now: DateTime<Utc>) -> StakedSummary {
        let mut entries = Vec::new();
        for index in 0..MAX_TIMELOCKS {
            match self.staking.timelock(account, index).await {
                Ok(Some(timelock)) => entries.push((index, timelock)),
                Ok(None) => break,
                Err(e) => {
                    warn!(account = %account, index, error = %e, "Timelock read failed");
                    break;
                }
            }
        }
        debug!(account = %account, entries = entries.len(), "Read staked positions");
        StakedSummary::from_timelocks(entries, &self.stake_token, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Timelock, TxError, U256};
    use crate::testkit::chain::MockStaking;
    use crate::testkit::domain::token;
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn units(whole: u64) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(18))
    }

    #[tokio::test]
    async fn splits_expired_and_locked() {
        let account = Address::repeat_byte(0xaa);
        let staking = Arc::new(MockStaking::new());
        staking.push_timelock(account, Timelock { amount: units(5), expires_at: 1_000 });
        staking.push_timelock(account, Timelock { amount: units(3), expires_at: 2_000 });
        staking.push_timelock(account, Timelock { amount: units(7), expires_at: 9_000 });

        let reader = StakedReader::new(staking, token("GATE", 18));
        let summary = reader.read(account, at(5_000)).await;

        assert_eq!(summary.unlocked_amount, dec!(8));
        assert_eq!(summary.locked.len(), 1);
        assert_eq!(summary.locked[0].id, 2);
        assert_eq!(summary.locked[0].amount, dec!(7));
        assert_eq!(summary.total(), dec!(15));
    }

    #[tokio::test]
    async fn read_error_keeps_entries_so_far() {
        let account = Address::repeat_byte(0xbb);
        let staking = Arc::new(MockStaking::new());
        staking.push_timelock(account, Timelock { amount: units(2), expires_at: 100 });
        staking.fail_timelock_at(1, TxError::transport("rpc down"));

        let reader = StakedReader::new(staking, token("GATE", 18));
        let summary = reader.read(account, at(5_000)).await;

        assert_eq!(summary.unlocked_amount, dec!(2));
        assert!(summary.locked.is_empty());
    }

    #[tokio::test]
    async fn no_stakes_is_empty() {
        let reader = StakedReader::new(Arc::new(MockStaking::new()), token("GATE", 18));
        let summary = reader.read(Address::repeat_byte(1), at(0)).await;
        assert_eq!(summary, StakedSummary::default());
    }
}
