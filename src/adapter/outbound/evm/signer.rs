//! Local wallet message signing.

use alloy_primitives::hex;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::domain::{TxError, TxResult};
use crate::port::MessageSigner;

pub struct EvmMessageSigner {
    signer: PrivateKeySigner,
}

impl EvmMessageSigner {
    #[must_use]
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl MessageSigner for EvmMessageSigner {
    async fn sign_message(&self, message: &str) -> TxResult<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| TxError::classify(e.to_string()))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}
