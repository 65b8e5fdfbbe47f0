//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the wallet, contracts, block source, gas tracker
//! and community backend the workflows depend on.

pub mod backend;
pub mod block;
pub mod gas;
pub mod signer;
pub mod staking;
pub mod token;
pub mod transaction;
