//! Message signing port.

use async_trait::async_trait;

use crate::domain::TxResult;

/// Wallet capability to sign an arbitrary message (EIP-191 personal sign).
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Sign `message`, returning the `0x`-prefixed hex signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the user rejects the request or signing fails.
    async fn sign_message(&self, message: &str) -> TxResult<String>;
}
