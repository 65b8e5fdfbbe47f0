//! ERC-20 token contract port.

use async_trait::async_trait;

use super::transaction::Transaction;
use crate::domain::{Address, TxResult, U256};

/// Port for the ERC-20 calls the allowance workflow needs.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// Address of the token contract.
    fn address(&self) -> Address;

    /// Current allowance `owner` has granted `spender`, in base units.
    ///
    /// # Errors
    ///
    /// Returns an error if the allowance cannot be read from the chain.
    async fn allowance(&self, owner: Address, spender: Address) -> TxResult<U256>;

    /// Submit an approval transaction. Resolves once the wallet has
    /// broadcast it, not once it is mined.
    ///
    /// # Errors
    ///
    /// Returns an error if the user rejects the request or submission fails.
    async fn approve(&self, spender: Address, amount: U256) -> TxResult<Transaction>;

    /// Token balance of `owner`, in base units.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be read from the chain.
    async fn balance_of(&self, owner: Address) -> TxResult<U256>;
}
