//! Provider construction.

use std::str::FromStr;

use alloy_primitives::Address;
use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::error::{ConfigError, Result};

/// An HTTP provider, with a signing wallet when a private key is available.
pub struct EvmClient {
    provider: DynProvider,
    signer: Option<PrivateKeySigner>,
}

impl EvmClient {
    /// Connect to `rpc_url`. Without a private key the client is read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or private key is invalid.
    pub fn connect(rpc_url: &str, chain_id: u64, private_key: Option<&str>) -> Result<Self> {
        let url = Url::parse(rpc_url).map_err(|e| ConfigError::InvalidValue {
            field: "rpc_url",
            reason: e.to_string(),
        })?;

        let signer = private_key
            .map(|key| {
                PrivateKeySigner::from_str(key.trim()).map_err(|e| ConfigError::InvalidValue {
                    field: "WALLET_PRIVATE_KEY",
                    reason: e.to_string(),
                })
            })
            .transpose()?
            .map(|signer| signer.with_chain_id(Some(chain_id)));

        let provider = match &signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        Ok(Self { provider, signer })
    }

    #[must_use]
    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    /// Address of the signing wallet, if any.
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    #[must_use]
    pub fn signer(&self) -> Option<PrivateKeySigner> {
        self.signer.clone()
    }
}
