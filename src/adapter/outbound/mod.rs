//! Outbound adapters (driven side).

pub mod backend;
pub mod catalog;
pub mod etherscan;
#[cfg(feature = "evm")]
pub mod evm;
pub mod feed;
