//! Allowance grant state machine.
//!
//! ```text
//!            Observed(sufficient)
//!   ┌──────────────────────────────────────────────────┐
//!   │                                                  ▼
//! Idle ──Allow──▶ Submitting ──Submitted──▶ Pending ──Confirmed──▶ Notification ──Dismiss/Elapsed──▶ Granted
//!   ▲                 │                        │
//!   │                 └──Failed──▶ Error ◀─────┘
//!   │                             │  ▲
//!   │                             └──┘ Allow re-enters Submitting
//!   └──────────── CloseModal (from any state)
//! ```

use serde::Serialize;

use crate::application::machine::Transition;
use crate::domain::{AllowanceStatus, TxError};
use crate::port::Transaction;

/// State of the allowance grant workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceState {
    /// Nothing in flight. The checker may still report sufficient allowance.
    Idle,
    /// Waiting for the user to confirm the approval in the wallet.
    Submitting,
    /// Approval broadcast, waiting to be mined.
    Pending(Transaction),
    /// Approval mined; a "you can now stake" notice is showing.
    Notification,
    /// Allowance is in place.
    Granted,
    Error(TxError),
}

impl AllowanceState {
    /// True when staking may proceed.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted | Self::Notification)
    }

    #[must_use]
    pub fn error(&self) -> Option<&TxError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AllowanceStateKind {
        match self {
            Self::Idle => AllowanceStateKind::Idle,
            Self::Submitting => AllowanceStateKind::Submitting,
            Self::Pending(_) => AllowanceStateKind::Pending,
            Self::Notification => AllowanceStateKind::Notification,
            Self::Granted => AllowanceStateKind::Granted,
            Self::Error(_) => AllowanceStateKind::Error,
        }
    }
}

/// Payload-free tag of [`AllowanceState`] for logging and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceStateKind {
    Idle,
    Submitting,
    Pending,
    Notification,
    Granted,
    Error,
}

/// Inputs of the allowance machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceEvent {
    /// The allowance checker produced a new reading.
    Observed(AllowanceStatus),
    /// User asked to approve the token.
    Allow,
    /// Wallet broadcast the approval.
    Submitted(Transaction),
    /// Approval was mined.
    Confirmed,
    Failed(TxError),
    /// User closed the success notice.
    DismissNotification,
    /// The success notice timer fired.
    NotificationElapsed,
    CloseModal,
}

/// Side effects requested by allowance transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceEffect {
    RequestApproval,
    AwaitConfirmation(Transaction),
    ScheduleNotificationExpiry,
}

/// Apply `event` to `state`.
#[must_use]
pub fn reduce(
    state: &AllowanceState,
    event: AllowanceEvent,
) -> Option<Transition<AllowanceState, AllowanceEffect>> {
    use AllowanceEvent as Ev;
    use AllowanceState as St;

    let transition = match (state, event) {
        (_, Ev::CloseModal) => Transition::to(St::Idle),

        (St::Idle | St::Error(_), Ev::Observed(AllowanceStatus::Sufficient)) => {
            Transition::to(St::Granted)
        }
        (St::Idle | St::Error(_), Ev::Allow) => {
            Transition::with(St::Submitting, AllowanceEffect::RequestApproval)
        }

        (St::Submitting, Ev::Submitted(tx)) => Transition::with(
            St::Pending(tx.clone()),
            AllowanceEffect::AwaitConfirmation(tx),
        ),
        (St::Submitting | St::Pending(_), Ev::Failed(error)) => Transition::to(St::Error(error)),

        (St::Pending(_), Ev::Confirmed) => Transition::with(
            St::Notification,
            AllowanceEffect::ScheduleNotificationExpiry,
        ),

        (St::Notification, Ev::DismissNotification | Ev::NotificationElapsed) => {
            Transition::to(St::Granted)
        }

        _ => return None,
    };
    Some(transition)
}
