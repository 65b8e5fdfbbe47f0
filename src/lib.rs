//! Stakegate - token allowance and staking for token-gated communities.
//!
//! A community grants levels to wallets that hold or stake its token.
//! Reaching a stake level takes two on-chain steps: approving the staking
//! contract to spend the token, then staking the required amount. This crate
//! drives both steps as one workflow and keeps it consistent with the chain
//! and with the connected wallet.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Chain-agnostic types and pure rules: levels, access
//!   evaluation, allowance sufficiency, timelocks, failure taxonomy
//! - **`port`** - Traits the workflows use to reach the outside world
//! - **`application`** - Pure state machines, the workflow coordinator and
//!   the session shared by every live workflow
//! - **`adapter`** - alloy contracts and block polling (`evm` feature), the
//!   community backend, the Etherscan gas tracker and the CLI
//! - **`infrastructure`** - Configuration, logging and runtime wiring
//!
//! # Workflow
//!
//! ```text
//!   open(level) ──▶ checkingAllowance ──▶ awaitingApproval ──allow──▶ approvalPending
//!                          │                                               │
//!                          └──────────── sufficient ──▶ approved ◀─────────┘
//!                                                         │ confirm_stake
//!                                                         ▼
//!                                  success ◀── stakingPending ◀── staking
//! ```
//!
//! Any failure lands in `error`; the trigger that failed can be retried.
//! Switching account or chain through the [`Session`](application::Session)
//! resets every live workflow.
//!
//! # Features
//!
//! - `evm` (default) - alloy-backed contracts, signer and block watcher, and the CLI
//! - `testkit` - scripted ports for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
