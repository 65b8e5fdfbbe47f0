//! Chain-agnostic domain types and pure rules.
//!
//! Nothing in this module performs I/O. Addresses and 256-bit amounts come
//! from `alloy-primitives` so that values flow unchanged between the domain,
//! the ports and the EVM adapter.

pub mod allowance;
pub mod chain;
pub mod duration;
pub mod failure;
pub mod identity;
pub mod level;
pub mod staked;
pub mod token;
pub mod transaction;

pub use alloy_primitives::{Address, TxHash, U256};

pub use allowance::{sufficiency_threshold, AllowanceKey, AllowanceStatus};
pub use chain::Chain;
pub use duration::format_duration;
pub use failure::{describe, ErrorInfo, TxError, TxErrorKind, TxResult};
pub use identity::Identity;
pub use level::{
    evaluate_access, DenialReason, Level, LevelAccess, LevelId, LevelRequirement,
    StakeRequirement,
};
pub use staked::{LockedStake, StakedSummary, Timelock};
pub use token::Token;
pub use transaction::Receipt;
