mod support;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use stakegate::application::allowance::AllowanceState;
use stakegate::application::stake::StakeState;
use stakegate::application::{StakeWorkflow, WorkflowConfig, WorkflowState};
use stakegate::domain::{AllowanceStatus, LevelId, TxErrorKind, TxError, U256};
use stakegate::error::{Error, WorkflowError};
use stakegate::testkit::chain::{receipt, tx_hash, ScriptedTransaction};
use stakegate::testkit::domain::account;
use tokio::time::Instant;
use stakegate::port::StakingContract;

use support::{owner, settle, stake_amount, wait_for, Harness, STAKE_LEVEL};

#[tokio::test]
async fn sufficient_allowance_skips_approval() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();

    workflow.open(STAKE_LEVEL).await.unwrap();
    let snapshot = wait_for(&workflow, |s| s.state == WorkflowState::Approved).await;

    assert_eq!(snapshot.allowance, AllowanceState::Granted);
    assert_eq!(snapshot.allowance_status, AllowanceStatus::Sufficient);
    assert!(snapshot.can_stake);
    assert_eq!(snapshot.stake_amount, Some(stake_amount()));
    assert!(harness.token.approvals().is_empty());
}

#[tokio::test(start_paused = true)]
async fn approval_shows_notice_before_granting() {
    let harness = Harness::new();
    let workflow = harness.workflow();

    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;

    let (approval, control) = ScriptedTransaction::pending(1);
    harness.token.script_approval(Ok(approval.into_transaction()));
    workflow.allow().unwrap();

    let pending = wait_for(&workflow, |s| s.state == WorkflowState::ApprovalPending).await;
    assert!(matches!(&pending.allowance, AllowanceState::Pending(tx) if tx.hash() == tx_hash(1)));
    assert!(!pending.can_stake);

    control.confirm();
    let notice = wait_for(&workflow, |s| s.allowance == AllowanceState::Notification).await;
    assert_eq!(notice.state, WorkflowState::Approved);
    assert!(notice.can_stake);

    let shown = Instant::now();
    wait_for(&workflow, |s| s.allowance == AllowanceState::Granted).await;
    assert!(shown.elapsed() >= WorkflowConfig::DEFAULT_NOTIFICATION_DELAY);

    assert_eq!(
        harness.token.approvals(),
        vec![(harness.staking.address(), U256::MAX)]
    );
}

#[tokio::test(start_paused = true)]
async fn dismissing_the_notice_grants_immediately() {
    let harness = Harness::with_config(|c| c.notification_delay = Duration::from_secs(60));
    let workflow = harness.workflow();

    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
    workflow.allow().unwrap();
    wait_for(&workflow, |s| s.allowance == AllowanceState::Notification).await;

    let before = Instant::now();
    workflow.dismiss_notification();

    assert_eq!(workflow.snapshot().allowance, AllowanceState::Granted);
    assert_eq!(before.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn rejected_approval_can_be_retried() {
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;

    harness
        .token
        .script_approval(Err(TxError::user_rejected("User denied transaction signature")));
    workflow.allow().unwrap();

    let failed = wait_for(&workflow, |s| s.state == WorkflowState::Error).await;
    let error = failed.error.expect("error held");
    assert_eq!(error.kind, TxErrorKind::UserRejected);
    assert!(matches!(failed.allowance, AllowanceState::Error(_)));

    workflow.allow().unwrap();
    wait_for(&workflow, |s| s.allowance.is_granted()).await;
    assert_eq!(harness.token.approvals().len(), 2);
}

#[tokio::test]
async fn stake_is_refused_before_allowance() {
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;

    let result = workflow.confirm_stake();

    assert!(matches!(
        result,
        Err(Error::Workflow(WorkflowError::StakeNotEnabled))
    ));
    assert_eq!(workflow.snapshot().stake, StakeState::Idle);
    settle().await;
    assert!(harness.staking.stakes().is_empty());
}

async fn assert_stake_refused(harness: &Harness, workflow: &StakeWorkflow) {
    let result = workflow.confirm_stake();

    assert!(matches!(
        result,
        Err(Error::Workflow(WorkflowError::StakeNotEnabled))
    ));
    assert_eq!(workflow.snapshot().stake, StakeState::Idle);
    settle().await;
    assert_eq!(workflow.snapshot().stake, StakeState::Idle);
    assert!(harness.staking.stakes().is_empty());
}

#[tokio::test]
async fn stake_is_refused_while_approval_is_unfinished() {
    // Wallet prompt still open.
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
    harness.token.set_wallet_hangs(true);
    workflow.allow().unwrap();
    wait_for(&workflow, |s| s.allowance == AllowanceState::Submitting).await;
    assert_stake_refused(&harness, &workflow).await;

    // Approval broadcast but not mined.
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
    let (approval, _control) = ScriptedTransaction::pending(1);
    harness.token.script_approval(Ok(approval.into_transaction()));
    workflow.allow().unwrap();
    wait_for(&workflow, |s| matches!(s.allowance, AllowanceState::Pending(_))).await;
    assert_stake_refused(&harness, &workflow).await;

    // Approval rejected.
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
    harness
        .token
        .script_approval(Err(TxError::user_rejected("User denied transaction signature")));
    workflow.allow().unwrap();
    wait_for(&workflow, |s| matches!(s.allowance, AllowanceState::Error(_))).await;
    assert_stake_refused(&harness, &workflow).await;
}

#[tokio::test]
async fn operations_need_an_open_level() {
    let harness = Harness::new();
    let workflow = harness.workflow();

    assert!(matches!(
        workflow.allow(),
        Err(Error::Workflow(WorkflowError::NotOpen))
    ));
    assert!(matches!(
        workflow.confirm_stake(),
        Err(Error::Workflow(WorkflowError::NotOpen))
    ));
    assert_eq!(workflow.state(), WorkflowState::Idle);
}

#[tokio::test]
async fn open_rejects_unknown_and_open_levels() {
    let harness = Harness::new();
    let workflow = harness.workflow();

    let unknown = workflow.open(LevelId::new(9)).await;
    assert!(matches!(
        unknown,
        Err(Error::Workflow(WorkflowError::UnknownLevel(id))) if id == LevelId::new(9)
    ));

    let open = workflow.open(LevelId::new(1)).await;
    assert!(matches!(
        open,
        Err(Error::Workflow(WorkflowError::NotStakeable(_)))
    ));
    assert_eq!(workflow.state(), WorkflowState::Idle);
}

#[tokio::test]
async fn stake_reports_pending_then_success() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    let (stake, control) = ScriptedTransaction::pending(2);
    harness.staking.script_stake(Ok(stake.into_transaction()));
    workflow.confirm_stake().unwrap();

    let pending = wait_for(&workflow, |s| s.state == WorkflowState::StakingPending).await;
    assert_eq!(
        pending.stake.transaction().map(|tx| tx.hash()),
        Some(tx_hash(2))
    );
    assert!(!pending.can_stake);

    control.confirm();
    let done = wait_for(&workflow, |s| s.state == WorkflowState::Success).await;
    match done.stake {
        StakeState::Success {
            receipt: Some(mined),
            ..
        } => assert_eq!(mined, receipt(2)),
        other => panic!("expected mined stake, got {other:?}"),
    }
    assert_eq!(harness.staking.stakes(), vec![(stake_amount(), None)]);
}

#[tokio::test]
async fn rejected_stake_can_be_retried() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    harness
        .staking
        .script_stake(Err(TxError::user_rejected("User denied transaction signature")));
    workflow.confirm_stake().unwrap();

    let failed = wait_for(&workflow, |s| s.state == WorkflowState::Error).await;
    assert!(matches!(failed.stake, StakeState::Error(_)));
    assert_eq!(failed.allowance, AllowanceState::Granted);
    assert!(failed.can_stake);

    workflow.confirm_stake().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::Success).await;
    assert_eq!(harness.staking.stakes().len(), 2);
}

#[tokio::test]
async fn reverted_stake_is_an_error() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    harness
        .staking
        .script_stake(Ok(ScriptedTransaction::reverted(2).into_transaction()));
    workflow.confirm_stake().unwrap();

    let failed = wait_for(&workflow, |s| s.state == WorkflowState::Error).await;
    assert_eq!(failed.error.map(|e| e.kind), Some(TxErrorKind::Reverted));
}

#[tokio::test]
async fn duplicate_stake_requests_are_ignored() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    harness.staking.set_wallet_hangs(true);
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    workflow.confirm_stake().unwrap();
    workflow.confirm_stake().unwrap();
    settle().await;

    assert_eq!(workflow.state(), WorkflowState::Staking);
    assert_eq!(harness.staking.stakes().len(), 1);
}

#[tokio::test]
async fn level_aware_staking_passes_the_level() {
    let harness = Harness::with_config(|c| c.level_aware = true);
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    workflow.confirm_stake().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::Success).await;

    assert_eq!(
        harness.staking.stakes(),
        vec![(stake_amount(), Some(STAKE_LEVEL))]
    );
}

#[tokio::test]
async fn close_resets_and_runs_callback() {
    let harness = Harness::new();
    harness.token.set_wallet_hangs(true);
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
    workflow.allow().unwrap();
    assert_eq!(workflow.snapshot().allowance, AllowanceState::Submitting);

    let closed = AtomicBool::new(false);
    workflow.close(|| closed.store(true, Ordering::SeqCst));

    let snapshot = workflow.snapshot();
    assert!(closed.load(Ordering::SeqCst));
    assert_eq!(snapshot.state, WorkflowState::Idle);
    assert_eq!(snapshot.allowance, AllowanceState::Idle);
    assert_eq!(snapshot.stake, StakeState::Idle);
    assert_eq!(snapshot.level, None);
}

#[tokio::test]
async fn late_confirmation_after_close_is_dropped() {
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;

    let (approval, control) = ScriptedTransaction::pending(1);
    harness.token.script_approval(Ok(approval.into_transaction()));
    workflow.allow().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::ApprovalPending).await;

    workflow.close(|| {});
    control.confirm();
    settle().await;

    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.state, WorkflowState::Idle);
    assert_eq!(snapshot.allowance, AllowanceState::Idle);
}

#[tokio::test]
async fn reset_clears_error_and_keeps_level() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    harness
        .staking
        .script_stake(Err(TxError::transport("connection reset")));
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;
    workflow.confirm_stake().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::Error).await;

    workflow.reset();

    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.level, Some(STAKE_LEVEL));
    assert_eq!(snapshot.stake, StakeState::Idle);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.state, WorkflowState::Approved);
}

#[tokio::test]
async fn new_block_revalidates_allowance() {
    let harness = Harness::new();
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;

    // Approved from another tab.
    harness.grant_allowance(owner());
    harness.feed.publish(101);

    let snapshot = wait_for(&workflow, |s| s.state == WorkflowState::Approved).await;
    assert_eq!(snapshot.allowance_status, AllowanceStatus::Sufficient);
}

#[tokio::test]
async fn failed_reading_keeps_last_status() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::Approved).await;
    let queries = harness.token.allowance_queries();

    harness
        .token
        .fail_allowance_queries(Some(TxError::transport("rpc unavailable")));
    harness.feed.publish(102);
    settle().await;

    assert!(harness.token.allowance_queries() > queries);
    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.allowance_status, AllowanceStatus::Sufficient);
    assert_eq!(snapshot.state, WorkflowState::Approved);
}

#[tokio::test]
async fn account_switch_resets_both_machines() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    harness
        .staking
        .script_stake(Err(TxError::user_rejected("User denied")));
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;
    workflow.confirm_stake().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::Error).await;

    harness.session.switch_account(Some(account(2)));

    let snapshot = workflow.snapshot();
    assert_eq!(snapshot.allowance, AllowanceState::Idle);
    assert_eq!(snapshot.stake, StakeState::Idle);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.level, Some(STAKE_LEVEL));

    // The new account has not approved anything.
    wait_for(&workflow, |s| s.state == WorkflowState::AwaitingApproval).await;
}

#[tokio::test]
async fn stake_from_previous_account_is_dropped() {
    let harness = Harness::new();
    harness.grant_allowance(owner());
    let workflow = harness.workflow();
    workflow.open(STAKE_LEVEL).await.unwrap();
    wait_for(&workflow, |s| s.can_stake).await;

    let (stake, control) = ScriptedTransaction::pending(2);
    harness.staking.script_stake(Ok(stake.into_transaction()));
    workflow.confirm_stake().unwrap();
    wait_for(&workflow, |s| s.state == WorkflowState::StakingPending).await;

    harness.session.switch_account(Some(account(2)));
    control.confirm();
    settle().await;

    assert_eq!(workflow.snapshot().stake, StakeState::Idle);
}

#[tokio::test]
async fn dropping_the_workflow_releases_block_subscription() {
    let harness = Harness::new();
    let workflow = harness.workflow();
    assert_eq!(harness.feed.subscriber_count(), 1);

    drop(workflow);

    tokio::time::timeout(Duration::from_secs(5), async {
        while harness.feed.subscriber_count() > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscription released");
}
