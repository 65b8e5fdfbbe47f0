//! Stake submission state machine.
//!
//! ```text
//! Idle ──Stake──▶ Staking ──Submitted──▶ Success{tx, receipt: None} ──Confirmed──▶ Success{tx, receipt}
//!   ▲                │                              │
//!   │                └──Failed──▶ Error ◀──Failed───┘ (revert while confirming)
//!   │                              │
//!   │                              └──Stake──▶ Staking
//!   └──────── CloseModal (from any state)
//! ```

use serde::Serialize;

use crate::application::machine::Transition;
use crate::domain::{Receipt, TxError};
use crate::port::Transaction;

/// State of the stake submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeState {
    Idle,
    /// Waiting for the user to confirm the stake in the wallet.
    Staking,
    /// Stake broadcast. The receipt is filled in once it is mined.
    Success {
        transaction: Transaction,
        receipt: Option<Receipt>,
    },
    Error(TxError),
}

impl StakeState {
    #[must_use]
    pub fn error(&self) -> Option<&TxError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Success { transaction, .. } => Some(transaction),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> StakeStateKind {
        match self {
            Self::Idle => StakeStateKind::Idle,
            Self::Staking => StakeStateKind::Staking,
            Self::Success { .. } => StakeStateKind::Success,
            Self::Error(_) => StakeStateKind::Error,
        }
    }
}

/// Payload-free tag of [`StakeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeStateKind {
    Idle,
    Staking,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeEvent {
    /// User confirmed the stake.
    Stake,
    Submitted(Transaction),
    Confirmed(Receipt),
    Failed(TxError),
    CloseModal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeEffect {
    SubmitStake,
    AwaitConfirmation(Transaction),
}

/// Apply `event` to `state`.
#[must_use]
pub fn reduce(state: &StakeState, event: StakeEvent) -> Option<Transition<StakeState, StakeEffect>> {
    use StakeEvent as Ev;
    use StakeState as St;

    let transition = match (state, event) {
        (_, Ev::CloseModal) => Transition::to(St::Idle),

        (St::Idle | St::Error(_), Ev::Stake) => Transition::with(St::Staking, StakeEffect::SubmitStake),

        (St::Staking, Ev::Submitted(transaction)) => Transition::with(
            St::Success {
                transaction: transaction.clone(),
                receipt: None,
            },
            StakeEffect::AwaitConfirmation(transaction),
        ),
        (St::Staking, Ev::Failed(error)) => Transition::to(St::Error(error)),

        (
            St::Success {
                transaction,
                receipt: None,
            },
            Ev::Confirmed(receipt),
        ) => Transition::to(St::Success {
            transaction: transaction.clone(),
            receipt: Some(receipt),
        }),
        (St::Success { receipt: None, .. }, Ev::Failed(error)) => Transition::to(St::Error(error)),

        _ => return None,
    };
    Some(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::chain::ScriptedTransaction;

    fn tx() -> Transaction {
        ScriptedTransaction::confirmed(7).into_transaction()
    }

    fn receipt(tx: &Transaction) -> Receipt {
        Receipt {
            transaction_hash: tx.hash(),
            block_number: Some(100),
            gas_used: 21_000,
        }
    }

    #[test]
    fn stake_from_idle_submits() {
        let t = reduce(&StakeState::Idle, StakeEvent::Stake).unwrap();
        assert_eq!(t.next, StakeState::Staking);
        assert_eq!(t.effect, Some(StakeEffect::SubmitStake));
    }

    #[test]
    fn submitted_is_success_and_retains_transaction() {
        let tx = tx();
        let t = reduce(&StakeState::Staking, StakeEvent::Submitted(tx.clone())).unwrap();
        assert_eq!(t.next.transaction(), Some(&tx));
        assert_eq!(t.effect, Some(StakeEffect::AwaitConfirmation(tx)));
    }

    #[test]
    fn receipt_is_recorded_once() {
        let tx = tx();
        let success = StakeState::Success {
            transaction: tx.clone(),
            receipt: None,
        };
        let confirmed = reduce(&success, StakeEvent::Confirmed(receipt(&tx))).unwrap().next;
        assert_eq!(
            confirmed,
            StakeState::Success {
                transaction: tx.clone(),
                receipt: Some(receipt(&tx)),
            }
        );
        assert!(reduce(&confirmed, StakeEvent::Confirmed(receipt(&tx))).is_none());
    }

    #[test]
    fn rejection_is_error_and_stake_retries() {
        let error = TxError::user_rejected("User rejected the request");
        let failed = reduce(&StakeState::Staking, StakeEvent::Failed(error.clone()))
            .unwrap()
            .next;
        assert_eq!(failed.error(), Some(&error));

        let retry = reduce(&failed, StakeEvent::Stake).unwrap();
        assert_eq!(retry.next, StakeState::Staking);
    }

    #[test]
    fn revert_while_confirming_is_error() {
        let success = StakeState::Success {
            transaction: tx(),
            receipt: None,
        };
        let error = TxError::reverted("execution reverted");
        let next = reduce(&success, StakeEvent::Failed(error.clone())).unwrap().next;
        assert_eq!(next, StakeState::Error(error));
    }

    #[test]
    fn success_is_terminal_for_stake() {
        let success = StakeState::Success {
            transaction: tx(),
            receipt: None,
        };
        assert!(reduce(&success, StakeEvent::Stake).is_none());
        assert!(reduce(&StakeState::Staking, StakeEvent::Stake).is_none());
    }

    #[test]
    fn close_modal_clears_everything() {
        let states = [
            StakeState::Staking,
            StakeState::Success {
                transaction: tx(),
                receipt: None,
            },
            StakeState::Error(TxError::transport("down")),
        ];
        for state in states {
            let t = reduce(&state, StakeEvent::CloseModal).unwrap();
            assert_eq!(t.next, StakeState::Idle);
            assert!(t.effect.is_none());
        }
    }
}
