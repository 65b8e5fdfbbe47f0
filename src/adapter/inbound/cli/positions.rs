//! `stakegate positions`.

use chrono::Utc;
use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::domain::LockedStake;
use crate::error::Result;
use crate::infrastructure::bootstrap::Runtime;

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "#")]
    id: u64,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Unlocks")]
    expires: String,
}

impl PositionRow {
    fn new(stake: &LockedStake, symbol: &str) -> Self {
        Self {
            id: stake.id,
            amount: format!("{} {symbol}", stake.amount),
            expires: stake.expires.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// List locked stakes and the unlocked total of the configured wallet.
pub async fn execute(runtime: &Runtime) -> Result<()> {
    let account = runtime.require_account()?;
    let symbol = &runtime.config.stake_token().symbol;

    let pb = output::spinner("Reading timelocks...");
    let summary = runtime.staked_reader().read(account, Utc::now()).await;
    output::spinner_success(
        &pb,
        &format!("Read {} positions", summary.locked.len()),
    );

    if output::is_json() {
        let locked: Vec<_> = summary
            .locked
            .iter()
            .map(|stake| {
                json!({
                    "id": stake.id,
                    "amount": stake.amount.to_string(),
                    "expires": stake.expires.to_rfc3339(),
                })
            })
            .collect();
        output::json_output(json!({
            "command": "positions",
            "account": account,
            "symbol": symbol,
            "unlocked": summary.unlocked_amount.to_string(),
            "locked": locked,
            "total": summary.total().to_string(),
        }));
        return Ok(());
    }

    output::section("Positions");
    output::field("Account", account);
    output::field("Unlocked", format!("{} {symbol}", summary.unlocked_amount));
    output::field("Total", format!("{} {symbol}", summary.total()));

    if summary.locked.is_empty() {
        output::hint("no locked stakes");
        return Ok(());
    }
    output::table(summary.locked.iter().map(|stake| PositionRow::new(stake, symbol)));
    Ok(())
}
