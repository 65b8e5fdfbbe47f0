//! Shared shape of the workflow state machines.
//!
//! Every machine is a pure reducer `(state, event) -> Option<Transition>`.
//! `None` means the event is not handled in the current state and is dropped.
//! A transition may request one effect; the runtime owning the machine runs
//! the effect and feeds its outcome back as a new event.

/// Next state plus the effect entering it requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, E> {
    pub next: S,
    pub effect: Option<E>,
}

impl<S, E> Transition<S, E> {
    /// Move to `next` without side effects.
    pub fn to(next: S) -> Self {
        Self { next, effect: None }
    }

    /// Move to `next` and run `effect`.
    pub fn with(next: S, effect: E) -> Self {
        Self {
            next,
            effect: Some(effect),
        }
    }
}
