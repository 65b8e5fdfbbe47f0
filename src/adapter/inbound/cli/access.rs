//! Wallet balances and level access evaluation shared by commands.

use rust_decimal::Decimal;

use crate::domain::{evaluate_access, Address, Level, LevelAccess};
use crate::error::Result;
use crate::infrastructure::bootstrap::Runtime;
use crate::infrastructure::config::Config;
use crate::port::TokenContract;

/// Token and stake-token balances of one account, in whole tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    pub token: Decimal,
    pub stake: Decimal,
}

/// Read both balances of `account`.
///
/// # Errors
///
/// Returns an error if either balance cannot be read.
pub async fn balances(runtime: &Runtime, account: Address) -> Result<Balances> {
    let (token, stake) = tokio::try_join!(
        runtime.token.balance_of(account),
        runtime.stake_token.balance_of(account),
    )?;
    Ok(Balances {
        token: runtime.config.token.from_base_units(token),
        stake: runtime.config.stake_token().from_base_units(stake),
    })
}

/// Access of the configured wallet to every level, in order.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or balances cannot be read.
pub async fn evaluate(config: &Config, levels: &[Level]) -> Result<Vec<Option<LevelAccess>>> {
    let runtime = Runtime::connect(config.clone())?;
    let balances = match runtime.account() {
        Some(account) => Some(balances(&runtime, account).await?),
        None => None,
    };

    Ok(levels
        .iter()
        .map(|level| {
            Some(evaluate_access(
                &level.requirement,
                balances.is_some(),
                balances.map(|b| b.token),
                balances.map(|b| b.stake),
            ))
        })
        .collect())
}
