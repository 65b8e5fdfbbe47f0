//! Inbound adapters (driving side).

#[cfg(feature = "evm")]
pub mod cli;
