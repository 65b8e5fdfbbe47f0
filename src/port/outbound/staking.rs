//! Staking contract port.

use async_trait::async_trait;

use super::transaction::Transaction;
use crate::domain::{Address, LevelId, Timelock, TxResult, U256};

#[async_trait]
pub trait StakingContract: Send + Sync {
    /// Address of the staking contract (the allowance spender).
    fn address(&self) -> Address;

    /// Submit a stake of `amount` base units, optionally for a specific level.
    ///
    /// # Errors
    ///
    /// Returns an error if the user rejects the request or submission fails.
    async fn stake(&self, amount: U256, level: Option<LevelId>) -> TxResult<Transaction>;

    /// Read the `index`-th timelock of `account`. `None` past the last entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract call fails.
    async fn timelock(&self, account: Address, index: u64) -> TxResult<Option<Timelock>>;
}
