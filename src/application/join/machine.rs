//! Platform join state machine.
//!
//! ```text
//! Disabled ──Enable──▶ Idle ──Sign──▶ Signing ──Signed──▶ Fetching ──Fetched──▶ Success
//!                                        │                   │
//!                                        └──Failed──▶ Error ◀┘
//!
//! Error ──Sign──▶ Signing        Error ──CloseModal──▶ Idle
//! Reset (from any state) ──▶ Disabled
//! ```

use serde::Serialize;

use crate::application::machine::Transition;
use crate::domain::TxError;
use crate::port::Invite;

/// Message the wallet signs to authenticate the join request.
pub const JOIN_MESSAGE: &str = "Please sign this message to generate your invite link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinState {
    Disabled,
    Idle,
    Signing,
    Fetching,
    Success(Invite),
    Error(TxError),
}

impl JoinState {
    #[must_use]
    pub const fn kind(&self) -> JoinStateKind {
        match self {
            Self::Disabled => JoinStateKind::Disabled,
            Self::Idle => JoinStateKind::Idle,
            Self::Signing => JoinStateKind::Signing,
            Self::Fetching => JoinStateKind::Fetching,
            Self::Success(_) => JoinStateKind::Success,
            Self::Error(_) => JoinStateKind::Error,
        }
    }

    #[must_use]
    pub fn invite(&self) -> Option<&Invite> {
        match self {
            Self::Success(invite) => Some(invite),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&TxError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStateKind {
    Disabled,
    Idle,
    Signing,
    Fetching,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinEvent {
    Enable,
    Sign,
    Signed(String),
    Fetched(Invite),
    Failed(TxError),
    CloseModal,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinEffect {
    RequestSignature,
    FetchInvite(String),
}

#[must_use]
pub fn reduce(state: &JoinState, event: JoinEvent) -> Option<Transition<JoinState, JoinEffect>> {
    use JoinEvent as Ev;
    use JoinState as St;

    let transition = match (state, event) {
        (_, Ev::Reset) => Transition::to(St::Disabled),
        (St::Disabled, Ev::Enable) => Transition::to(St::Idle),
        (St::Idle | St::Error(_), Ev::Sign) => {
            Transition::with(St::Signing, JoinEffect::RequestSignature)
        }
        (St::Signing, Ev::Signed(signature)) => {
            Transition::with(St::Fetching, JoinEffect::FetchInvite(signature))
        }
        (St::Fetching, Ev::Fetched(invite)) => Transition::to(St::Success(invite)),
        (St::Signing | St::Fetching, Ev::Failed(error)) => Transition::to(St::Error(error)),
        (St::Error(_), Ev::CloseModal) => Transition::to(St::Idle),
        _ => return None,
    };
    Some(transition)
}
