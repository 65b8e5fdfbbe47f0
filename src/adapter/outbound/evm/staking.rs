//! Staking contract.

use alloy_provider::DynProvider;
use async_trait::async_trait;
use tracing::debug;

use super::contract::ITokenStaking;
use super::transaction::EvmTransaction;
use crate::domain::{Address, LevelId, Timelock, TxError, TxErrorKind, TxResult, U256};
use crate::port::{StakingContract, Transaction};

/// Staking contract holding timelocked stakes.
///
/// With `level_aware` set, stakes that name a level call `stakeForLevel`;
/// otherwise every stake calls `stake`.
pub struct EvmStaking {
    address: Address,
    provider: DynProvider,
    level_aware: bool,
}

impl EvmStaking {
    #[must_use]
    pub fn new(address: Address, provider: DynProvider, level_aware: bool) -> Self {
        Self {
            address,
            provider,
            level_aware,
        }
    }

    fn contract(&self) -> ITokenStaking::ITokenStakingInstance<DynProvider> {
        ITokenStaking::new(self.address, self.provider.clone())
    }
}

#[async_trait]
impl StakingContract for EvmStaking {
    fn address(&self) -> Address {
        self.address
    }

    async fn stake(&self, amount: U256, level: Option<LevelId>) -> TxResult<Transaction> {
        let contract = self.contract();
        let sent = match level.filter(|_| self.level_aware) {
            Some(level) => contract.stakeForLevel(amount, level.get()).send().await,
            None => contract.stake(amount).send().await,
        };
        let pending = sent.map_err(|e| TxError::classify(e.to_string()))?;
        Ok(EvmTransaction::submitted(self.provider.clone(), *pending.tx_hash()).await)
    }

    async fn timelock(&self, account: Address, index: u64) -> TxResult<Option<Timelock>> {
        let entry = match self
            .contract()
            .timelocks(account, U256::from(index))
            .call()
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                let error = TxError::classify(e.to_string());
                // Reading past the end of the array reverts.
                if error.kind == TxErrorKind::Reverted {
                    debug!(account = %account, index, "No timelock at index");
                    return Ok(None);
                }
                return Err(error);
            }
        };
        if entry.amount == 0 && entry.expires == 0 {
            return Ok(None);
        }
        Ok(Some(Timelock {
            amount: U256::from(entry.amount),
            expires_at: entry.expires,
        }))
    }
}
