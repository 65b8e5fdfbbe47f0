//! Submitted transaction handles.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Receipt, TxHash, TxResult};

/// A transaction that has been broadcast but not necessarily mined.
///
/// Broadcast transactions cannot be cancelled; dropping the handle only stops
/// observing it.
#[async_trait]
pub trait TransactionHandle: Send + Sync {
    /// Hash of the broadcast transaction.
    fn hash(&self) -> TxHash;

    /// Gas price (wei) the transaction was submitted with, if known.
    fn gas_price(&self) -> Option<u128>;

    /// Wait until the transaction is mined.
    ///
    /// # Errors
    ///
    /// Returns a [`TxErrorKind::Reverted`](crate::domain::TxErrorKind::Reverted)
    /// error if the transaction reverted, or a transport error if the receipt
    /// could not be fetched.
    async fn wait(&self) -> TxResult<Receipt>;
}

/// Shared, cloneable reference to a [`TransactionHandle`].
///
/// Two references are equal when they point at the same transaction hash.
#[derive(Clone)]
pub struct Transaction(Arc<dyn TransactionHandle>);

impl Transaction {
    pub fn new(handle: impl TransactionHandle + 'static) -> Self {
        Self(Arc::new(handle))
    }

    #[must_use]
    pub fn hash(&self) -> TxHash {
        self.0.hash()
    }

    #[must_use]
    pub fn gas_price(&self) -> Option<u128> {
        self.0.gas_price()
    }

    /// Wait until the transaction is mined. See [`TransactionHandle::wait`].
    pub async fn wait(&self) -> TxResult<Receipt> {
        self.0.wait().await
    }
}

impl From<Arc<dyn TransactionHandle>> for Transaction {
    fn from(handle: Arc<dyn TransactionHandle>) -> Self {
        Self(handle)
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for Transaction {}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("hash", &self.hash())
            .field("gas_price", &self.gas_price())
            .finish()
    }
}
