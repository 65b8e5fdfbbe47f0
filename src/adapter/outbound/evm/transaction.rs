//! Broadcast EVM transactions.

use alloy_provider::network::ReceiptResponse;
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider};
use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Receipt, TxError, TxHash, TxResult};
use crate::port::{Transaction, TransactionHandle};

/// A transaction broadcast through an alloy provider.
pub struct EvmTransaction {
    hash: TxHash,
    gas_price: Option<u128>,
    provider: DynProvider,
}

impl EvmTransaction {
    /// Wrap a freshly broadcast transaction. The gas price is read from the
    /// node at submission time and is only used for estimates.
    pub async fn submitted(provider: DynProvider, hash: TxHash) -> Transaction {
        let gas_price = match provider.get_gas_price().await {
            Ok(price) => Some(price),
            Err(e) => {
                debug!(tx = %hash, error = %e, "Gas price unavailable");
                None
            }
        };
        Transaction::new(Self {
            hash,
            gas_price,
            provider,
        })
    }
}

#[async_trait]
impl TransactionHandle for EvmTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    fn gas_price(&self) -> Option<u128> {
        self.gas_price
    }

    async fn wait(&self) -> TxResult<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), self.hash)
            .get_receipt()
            .await
            .map_err(|e| TxError::transport(e.to_string()))?;

        if !receipt.status() {
            return Err(TxError::reverted(format!(
                "transaction {} reverted",
                self.hash
            )));
        }
        Ok(Receipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
