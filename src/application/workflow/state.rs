//! Coordinator view over the allowance and stake machines.

use std::fmt;

use serde::Serialize;

use crate::application::allowance::AllowanceState;
use crate::application::stake::StakeState;
use crate::domain::{AllowanceStatus, LevelId, StakeRequirement, TxError, U256};

/// User-facing stage of a stake workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    Idle,
    CheckingAllowance,
    AwaitingApproval,
    ApprovalPending,
    Approved,
    Staking,
    StakingPending,
    Success,
    Error,
}

impl WorkflowState {
    /// Derive the stage from both sub-machines and the last allowance reading.
    ///
    /// Rules are evaluated top to bottom and the first match wins, so a stake
    /// in flight is reported even if a stale allowance error is still held.
    #[must_use]
    pub fn derive(
        opened: bool,
        allowance: &AllowanceState,
        stake: &StakeState,
        status: AllowanceStatus,
    ) -> Self {
        if !opened {
            return Self::Idle;
        }
        match stake {
            StakeState::Success {
                receipt: Some(_), ..
            } => return Self::Success,
            StakeState::Success { receipt: None, .. } => return Self::StakingPending,
            StakeState::Staking => return Self::Staking,
            StakeState::Idle | StakeState::Error(_) => {}
        }
        if allowance.error().is_some() || stake.error().is_some() {
            return Self::Error;
        }
        match allowance {
            AllowanceState::Granted | AllowanceState::Notification => Self::Approved,
            AllowanceState::Pending(_) => Self::ApprovalPending,
            AllowanceState::Submitting => Self::AwaitingApproval,
            AllowanceState::Idle if status == AllowanceStatus::Insufficient => {
                Self::AwaitingApproval
            }
            _ => Self::CheckingAllowance,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingAllowance => "checkingAllowance",
            Self::AwaitingApproval => "awaitingApproval",
            Self::ApprovalPending => "approvalPending",
            Self::Approved => "approved",
            Self::Staking => "staking",
            Self::StakingPending => "stakingPending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// True while a wallet or chain round trip is outstanding.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::CheckingAllowance | Self::ApprovalPending | Self::Staking | Self::StakingPending
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a caller needs to render one workflow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub allowance: AllowanceState,
    pub stake: StakeState,
    pub allowance_status: AllowanceStatus,
    pub level: Option<LevelId>,
    pub requirement: Option<StakeRequirement>,
    /// Requirement converted to stake-token base units.
    pub stake_amount: Option<U256>,
    /// Current error of either machine; the allowance error wins when both
    /// are set.
    pub error: Option<TxError>,
    /// Whether `confirm_stake` would be accepted.
    pub can_stake: bool,
}

impl WorkflowSnapshot {
    /// Snapshot of a workflow that has not been opened.
    #[must_use]
    pub fn closed(status: AllowanceStatus) -> Self {
        Self::build(None, None, None, AllowanceState::Idle, StakeState::Idle, status)
    }

    pub(crate) fn build(
        level: Option<LevelId>,
        requirement: Option<StakeRequirement>,
        stake_amount: Option<U256>,
        allowance: AllowanceState,
        stake: StakeState,
        allowance_status: AllowanceStatus,
    ) -> Self {
        let opened = level.is_some();
        let state = WorkflowState::derive(opened, &allowance, &stake, allowance_status);
        let error = allowance.error().or_else(|| stake.error()).cloned();
        let can_stake = opened
            && allowance.is_granted()
            && matches!(stake, StakeState::Idle | StakeState::Error(_));
        Self {
            state,
            allowance,
            stake,
            allowance_status,
            level,
            requirement,
            stake_amount,
            error,
            can_stake,
        }
    }
}
