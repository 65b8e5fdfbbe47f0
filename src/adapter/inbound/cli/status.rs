//! `stakegate status`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use super::access::balances;
use crate::adapter::inbound::cli::output;
use crate::application::allowance::AllowanceChecker;
use crate::domain::AllowanceStatus;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::Runtime;
use crate::port::{StakingContract, TokenContract};

/// Show balances, allowance and staked total of the configured wallet.
pub async fn execute(runtime: &Runtime) -> Result<()> {
    let config = &runtime.config;
    let account = runtime.require_account()?;

    let pb = output::spinner("Reading wallet...");
    let token: Arc<dyn TokenContract> = runtime.token.clone();
    let checker = AllowanceChecker::new(token, runtime.staking.address(), Some(account));
    let (balances, allowance, staked) = match tokio::try_join!(
        balances(runtime, account),
        async { Ok::<_, Error>(checker.refresh().await) },
        async { Ok::<_, Error>(runtime.staked_reader().read(account, Utc::now()).await) },
    ) {
        Ok(values) => {
            output::spinner_success(&pb, "Read wallet");
            values
        }
        Err(e) => {
            output::spinner_fail(&pb, "Failed to read wallet");
            return Err(e);
        }
    };

    let token = &config.token;
    let stake_token = config.stake_token();

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "chain": config.chain().name(),
            "account": account,
            "token": { "symbol": token.symbol, "balance": balances.token.to_string() },
            "stake_token": { "symbol": stake_token.symbol, "balance": balances.stake.to_string() },
            "staking_contract": runtime.staking.address(),
            "allowance": allowance.as_str(),
            "staked": {
                "total": staked.total().to_string(),
                "unlocked": staked.unlocked_amount.to_string(),
                "locked_positions": staked.locked.len(),
            },
        }));
        return Ok(());
    }

    output::section("Wallet");
    output::field("Chain", config.chain().name());
    output::field("Account", output::highlight(account));
    output::field("Balance", format!("{} {}", balances.token, token.symbol));
    output::field("Staked", format!("{} {}", balances.stake, stake_token.symbol));

    output::section("Staking");
    output::field("Contract", runtime.staking.address());
    let allowance_text = match allowance {
        AllowanceStatus::Sufficient => output::positive("approved"),
        AllowanceStatus::Insufficient => output::negative("not approved"),
        AllowanceStatus::Unknown => output::muted("unknown"),
    };
    output::field("Allowance", allowance_text);
    output::field(
        "Positions",
        format!(
            "{} locked, {} {} unlocked",
            staked.locked.len(),
            staked.unlocked_amount,
            stake_token.symbol
        ),
    );

    if allowance == AllowanceStatus::Insufficient {
        output::hint("approve with `stakegate approve --level <id>`");
    }
    Ok(())
}
