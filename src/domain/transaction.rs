//! Confirmed transaction data.

use alloy_primitives::TxHash;
use serde::Serialize;

/// Receipt of a mined, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}
