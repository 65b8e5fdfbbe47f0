//! Allowance checking and granting.

pub mod checker;
pub mod machine;

pub use checker::AllowanceChecker;
pub use machine::{AllowanceEffect, AllowanceEvent, AllowanceState, AllowanceStateKind};
