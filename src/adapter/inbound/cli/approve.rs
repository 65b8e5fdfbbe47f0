//! `stakegate approve --level <id>`.

use serde_json::json;

use super::flow;
use crate::adapter::inbound::cli::output;
use crate::domain::LevelId;
use crate::error::{Result, WorkflowError};
use crate::infrastructure::bootstrap::Runtime;
use crate::port::StakingContract;

/// Approve the staking contract to spend the token for `level`.
pub async fn execute(runtime: &Runtime, level: u64, assume_yes: bool) -> Result<()> {
    if runtime.client.signer().is_none() {
        return Err(WorkflowError::NoAccount.into());
    }
    let account = runtime.require_account()?;
    let token = &runtime.config.token;

    output::section("Token Approval");
    output::field("Account", account);
    output::field("Token", format!("{} ({})", token.symbol, token.address));
    output::field("Spender", runtime.staking.address());

    let watcher = flow::start_block_watcher(runtime).await;
    let workflow = runtime.workflow();
    let result = async {
        let snapshot = flow::open(&workflow, LevelId::new(level)).await?;
        if snapshot.allowance.is_granted() {
            output::success("Allowance already in place");
            return Ok(None);
        }

        let prompt = format!("Approve the staking contract to spend your {}?", token.symbol);
        if !flow::confirm(&prompt, assume_yes)? {
            output::warning("Approval cancelled");
            return Ok(None);
        }
        flow::approve(&workflow).await
    }
    .await;
    workflow.close(|| {});
    if let Some(watcher) = watcher {
        watcher.abort();
    }

    let hash = result?;
    if output::is_json() {
        output::json_output(json!({
            "command": "approve",
            "level": level,
            "approved": true,
            "transaction": hash,
        }));
        return Ok(());
    }
    if let Some(hash) = hash {
        output::transaction("Transaction", hash, runtime.config.chain().explorer_tx_url(&hash));
    }
    Ok(())
}
