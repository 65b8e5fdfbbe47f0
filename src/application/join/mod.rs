//! Platform join (invite link) workflow.

pub mod machine;
pub mod workflow;

pub use machine::{JoinEffect, JoinEvent, JoinState, JoinStateKind, JOIN_MESSAGE};
pub use workflow::{JoinTarget, JoinWorkflow};
