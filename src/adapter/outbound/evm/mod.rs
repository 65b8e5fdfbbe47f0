//! EVM adapter: alloy-backed contracts, transactions, blocks and signing.

pub mod block;
pub mod client;
pub mod contract;
pub mod signer;
pub mod staking;
pub mod token;
pub mod transaction;

pub use block::watch_blocks;
pub use client::EvmClient;
pub use signer::EvmMessageSigner;
pub use staking::EvmStaking;
pub use token::Erc20Token;
pub use transaction::EvmTransaction;
