//! Driving a [`StakeWorkflow`] from the terminal.

use std::time::Duration;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::adapter::inbound::cli::output;
use crate::application::allowance::AllowanceState;
use crate::application::{StakeWorkflow, WorkflowSnapshot, WorkflowState};
use crate::domain::{LevelId, TxError, TxHash};
use crate::error::{Error, Result, WorkflowError};
use crate::infrastructure::bootstrap::Runtime;

/// Longest wait for the first allowance reading.
const READING_TIMEOUT: Duration = Duration::from_secs(30);

/// Spinner text for a workflow stage.
#[must_use]
pub fn stage_message(state: WorkflowState) -> &'static str {
    match state {
        WorkflowState::Idle => "Idle",
        WorkflowState::CheckingAllowance => "Checking allowance...",
        WorkflowState::AwaitingApproval => "Waiting for approval...",
        WorkflowState::ApprovalPending => "Approval pending...",
        WorkflowState::Approved => "Allowance approved",
        WorkflowState::Staking => "Submitting stake...",
        WorkflowState::StakingPending => "Stake pending...",
        WorkflowState::Success => "Staked",
        WorkflowState::Error => "Failed",
    }
}

/// Follow snapshots until `done` accepts one, narrating on `pb`.
pub async fn follow(
    workflow: &StakeWorkflow,
    pb: &ProgressBar,
    mut done: impl FnMut(&WorkflowSnapshot) -> bool,
) -> WorkflowSnapshot {
    let mut updates = workflow.subscribe();
    loop {
        let snapshot = updates.borrow_and_update().clone();
        pb.set_message(stage_message(snapshot.state));
        if done(&snapshot) {
            return snapshot;
        }
        if updates.changed().await.is_err() {
            return workflow.snapshot();
        }
    }
}

/// Ask the user to confirm, unless `--yes` or JSON mode.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes || output::is_json() {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Start the block watcher so allowance readings follow the chain.
///
/// Nodes without filter support still work: readings then only refresh on
/// workflow transitions.
pub async fn start_block_watcher(runtime: &Runtime) -> Option<JoinHandle<()>> {
    match runtime.watch_blocks().await {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Block watcher unavailable");
            None
        }
    }
}

/// Open `level` and wait for the first allowance reading.
///
/// # Errors
///
/// Returns an error if the level cannot be opened or the allowance cannot
/// be read in time.
pub async fn open(workflow: &StakeWorkflow, level: LevelId) -> Result<WorkflowSnapshot> {
    workflow.open(level).await?;

    let pb = output::spinner("Checking allowance...");
    let reading = tokio::time::timeout(
        READING_TIMEOUT,
        follow(workflow, &pb, |s| !s.state.is_busy()),
    )
    .await;

    match reading {
        Ok(snapshot) if snapshot.state == WorkflowState::Error => {
            output::spinner_fail(&pb, "Allowance check failed");
            Err(failure(&snapshot))
        }
        Ok(snapshot) => {
            output::spinner_success(&pb, &format!("Allowance {}", snapshot.allowance_status));
            Ok(snapshot)
        }
        Err(_) => {
            output::spinner_fail(&pb, "Allowance check timed out");
            Err(TxError::transport("allowance could not be read from the node").into())
        }
    }
}

/// Approve the staking contract and wait until the approval is mined.
///
/// # Errors
///
/// Returns the wallet or chain failure that stopped the approval.
pub async fn approve(workflow: &StakeWorkflow) -> Result<Option<TxHash>> {
    workflow.allow()?;

    let pb = output::spinner("Waiting for approval...");
    let mut hash = None;
    let snapshot = follow(workflow, &pb, |s| {
        if let AllowanceState::Pending(tx) = &s.allowance {
            hash = Some(tx.hash());
        }
        s.allowance.is_granted() || s.state == WorkflowState::Error
    })
    .await;

    if snapshot.state == WorkflowState::Error {
        output::spinner_fail(&pb, "Approval failed");
        return Err(failure(&snapshot));
    }
    output::spinner_success(&pb, "Allowance approved");
    workflow.dismiss_notification();
    Ok(hash)
}

/// Error held by the workflow, or a generic one if it was cleared meanwhile.
#[must_use]
pub fn failure(snapshot: &WorkflowSnapshot) -> Error {
    match &snapshot.error {
        Some(error) => Error::Transaction(error.clone()),
        None => Error::Workflow(WorkflowError::NotOpen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_a_message() {
        for state in [
            WorkflowState::Idle,
            WorkflowState::CheckingAllowance,
            WorkflowState::AwaitingApproval,
            WorkflowState::ApprovalPending,
            WorkflowState::Approved,
            WorkflowState::Staking,
            WorkflowState::StakingPending,
            WorkflowState::Success,
            WorkflowState::Error,
        ] {
            assert!(!stage_message(state).is_empty());
        }
    }

    #[test]
    fn failure_prefers_held_error() {
        let mut snapshot = WorkflowSnapshot::closed(crate::domain::AllowanceStatus::Unknown);
        assert!(matches!(failure(&snapshot), Error::Workflow(_)));

        snapshot.error = Some(TxError::reverted("out of gas"));
        assert!(matches!(failure(&snapshot), Error::Transaction(e) if e.message == "out of gas"));
    }
}
