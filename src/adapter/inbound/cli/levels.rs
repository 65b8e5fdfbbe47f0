//! `stakegate levels`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::domain::{format_duration, Level, LevelAccess, LevelRequirement};
use crate::error::Result;
use crate::infrastructure::bootstrap::load_levels;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Id")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Requirement")]
    requirement: String,
    #[tabled(rename = "Lock")]
    lock: String,
    #[tabled(rename = "Access")]
    access: String,
}

fn requirement_text(level: &Level, symbol: &str) -> String {
    match &level.requirement {
        LevelRequirement::Open => "open".to_string(),
        LevelRequirement::Hold { amount } => format!("hold {amount} {symbol}"),
        LevelRequirement::Stake { amount, .. } => format!("stake {amount} {symbol}"),
    }
}

fn lock_text(level: &Level) -> String {
    level
        .stake_requirement()
        .map_or_else(|| "-".to_string(), |r| format_duration(r.timelock))
}

fn access_text(access: Option<LevelAccess>) -> String {
    match access {
        None => output::muted("-"),
        Some(LevelAccess::Granted) => output::positive("granted"),
        Some(LevelAccess::Denied(reason)) => output::negative(reason.message()),
    }
}

/// List levels, optionally evaluating access for the configured wallet.
///
/// Without `--check` no chain request is made.
pub async fn execute(config: &Config, check: bool) -> Result<()> {
    let pb = output::spinner("Loading levels...");
    let levels = match load_levels(config).await {
        Ok(levels) => {
            output::spinner_success(&pb, &format!("Loaded {} levels", levels.len()));
            levels
        }
        Err(e) => {
            output::spinner_fail(&pb, "Failed to load levels");
            return Err(e);
        }
    };

    let access = if check {
        super::access::evaluate(config, &levels).await?
    } else {
        vec![None; levels.len()]
    };

    let symbol = &config.token.symbol;
    if output::is_json() {
        let levels: Vec<_> = levels
            .iter()
            .zip(&access)
            .map(|(level, access)| {
                json!({
                    "id": level.id.get(),
                    "name": level.name,
                    "description": level.description,
                    "type": level.requirement.kind(),
                    "amount": level.requirement.amount().to_string(),
                    "timelock_ms": level.stake_requirement().map(|r| r.timelock.as_millis()),
                    "access": access.map(|a| match a {
                        LevelAccess::Granted => "granted",
                        LevelAccess::Denied(reason) => reason.message(),
                    }),
                })
            })
            .collect();
        output::json_output(json!({ "command": "levels", "levels": levels }));
        return Ok(());
    }

    output::section("Levels");
    if levels.is_empty() {
        output::hint("declare [[levels]] in the config or configure [backend]");
        return Ok(());
    }

    let rows = levels.iter().zip(access).map(|(level, access)| LevelRow {
        id: level.id.get(),
        name: level.name.clone(),
        requirement: requirement_text(level, symbol),
        lock: lock_text(level),
        access: access_text(access),
    });
    output::table(rows);

    Ok(())
}
