//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - Scripted [`TokenContract`](crate::port::TokenContract),
//!   [`StakingContract`](crate::port::StakingContract) and transaction handles
//!   whose confirmation the test controls.
//! - [`backend`] - Scripted signer, community backend and gas tracker.
//! - [`domain`] - Builders for domain primitives: tokens, levels, accounts.
//! - [`config`] - Canonical test configuration.

pub mod backend;
pub mod chain;
pub mod config;
pub mod domain;
