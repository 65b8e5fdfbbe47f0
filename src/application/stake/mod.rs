//! Stake submission.

pub mod machine;

pub use machine::{StakeEffect, StakeEvent, StakeState, StakeStateKind};
