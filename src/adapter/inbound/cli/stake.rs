//! `stakegate stake --level <id>`.

use serde_json::json;

use super::flow;
use crate::adapter::inbound::cli::output;
use crate::application::stake::StakeState;
use crate::application::{StakeWorkflow, WorkflowState};
use crate::domain::{format_duration, LevelId, Receipt, TxHash};
use crate::error::{Result, WorkflowError};
use crate::infrastructure::bootstrap::Runtime;

struct Staked {
    approval: Option<TxHash>,
    receipt: Receipt,
}

/// Stake the amount `level` requires, approving the token first if needed.
pub async fn execute(runtime: &Runtime, level: u64, assume_yes: bool) -> Result<()> {
    if runtime.client.signer().is_none() {
        return Err(WorkflowError::NoAccount.into());
    }
    runtime.require_account()?;

    output::section("Stake");

    let watcher = flow::start_block_watcher(runtime).await;
    let workflow = runtime.workflow();
    let result = run(runtime, &workflow, LevelId::new(level), assume_yes).await;
    workflow.close(|| {});
    if let Some(watcher) = watcher {
        watcher.abort();
    }

    let Some(staked) = result? else {
        return Ok(());
    };
    let chain = runtime.config.chain();
    let hash = staked.receipt.transaction_hash;

    if output::is_json() {
        output::json_output(json!({
            "command": "stake",
            "level": level,
            "approval": staked.approval,
            "transaction": hash,
            "block": staked.receipt.block_number,
            "gas_used": staked.receipt.gas_used,
        }));
        return Ok(());
    }

    output::success("Stake confirmed");
    if let Some(approval) = staked.approval {
        output::transaction("Approval", approval, chain.explorer_tx_url(&approval));
    }
    output::transaction("Transaction", hash, chain.explorer_tx_url(&hash));
    if let Some(block) = staked.receipt.block_number {
        output::field("Block", block);
    }
    Ok(())
}

async fn run(
    runtime: &Runtime,
    workflow: &StakeWorkflow,
    level: LevelId,
    assume_yes: bool,
) -> Result<Option<Staked>> {
    let snapshot = flow::open(workflow, level).await?;
    let stake_token = runtime.config.stake_token();

    if let Some(requirement) = &snapshot.requirement {
        output::field("Level", level);
        output::field("Amount", format!("{} {}", requirement.amount, stake_token.symbol));
        output::field("Lock", format_duration(requirement.timelock));
    }

    let mut approval = None;
    if !snapshot.allowance.is_granted() {
        output::warning(&format!(
            "The staking contract is not approved to spend your {}",
            runtime.config.token.symbol
        ));
        if !flow::confirm("Approve it now?", assume_yes)? {
            output::warning("Stake cancelled");
            return Ok(None);
        }
        approval = flow::approve(workflow).await?;
    }

    if !flow::confirm("Submit the stake?", assume_yes)? {
        output::warning("Stake cancelled");
        return Ok(None);
    }
    workflow.confirm_stake()?;

    let pb = output::spinner("Submitting stake...");
    let submitted = flow::follow(workflow, &pb, |s| {
        matches!(s.state, WorkflowState::StakingPending | WorkflowState::Success)
            || s.error.is_some()
    })
    .await;

    if let StakeState::Success { transaction, .. } = &submitted.stake {
        if let Some(estimate) = runtime
            .estimator
            .estimate(transaction, runtime.config.chain())
            .await
        {
            pb.suspend(|| output::field("Estimate", format_duration(estimate)));
        }
    }

    let done = flow::follow(workflow, &pb, |s| {
        s.state == WorkflowState::Success || s.error.is_some()
    })
    .await;

    match &done.stake {
        StakeState::Success {
            receipt: Some(receipt),
            ..
        } => {
            output::spinner_success(&pb, "Stake mined");
            Ok(Some(Staked {
                approval,
                receipt: receipt.clone(),
            }))
        }
        _ => {
            output::spinner_fail(&pb, "Stake failed");
            Err(flow::failure(&done))
        }
    }
}
