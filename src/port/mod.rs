//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The workflow engine talks to the outside world only through these traits:
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!                 │  allowance · stake · join│
//!                 └────────────┬─────────────┘
//!          ┌───────────────────┼────────────────────┐
//!          ▼                   ▼                    ▼
//!   ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//!   │ EVM adapter │     │  Backend    │     │ Gas tracker  │
//!   │ (contracts, │     │  (levels,   │     │ (Etherscan)  │
//!   │  blocks)    │     │   invites)  │     │              │
//!   └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`TokenContract`], [`StakingContract`], [`TransactionHandle`] - on-chain calls
//! - [`BlockNotifier`] - new-block push source for revalidation
//! - [`GasTracker`] - confirmation time lookup
//! - [`MessageSigner`] - personal-sign for backend authentication
//! - [`RequirementSource`], [`CommunityBackend`] - community configuration

pub mod outbound;

pub use outbound::backend::{CommunityBackend, Invite, JoinRequest, RequirementSource};
pub use outbound::block::{BlockNotifier, BlockSubscription};
pub use outbound::gas::GasTracker;
pub use outbound::signer::MessageSigner;
pub use outbound::staking::StakingContract;
pub use outbound::token::TokenContract;
pub use outbound::transaction::{Transaction, TransactionHandle};
