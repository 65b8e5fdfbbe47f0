//! ERC-20 token contract.

use alloy_provider::DynProvider;
use async_trait::async_trait;

use super::contract::IERC20;
use super::transaction::EvmTransaction;
use crate::domain::{Address, TxError, TxResult, U256};
use crate::port::{TokenContract, Transaction};

pub struct Erc20Token {
    address: Address,
    provider: DynProvider,
}

impl Erc20Token {
    #[must_use]
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    fn contract(&self) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(self.address, self.provider.clone())
    }
}

#[async_trait]
impl TokenContract for Erc20Token {
    fn address(&self) -> Address {
        self.address
    }

    async fn allowance(&self, owner: Address, spender: Address) -> TxResult<U256> {
        self.contract()
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| TxError::classify(e.to_string()))
    }

    async fn approve(&self, spender: Address, amount: U256) -> TxResult<Transaction> {
        let pending = self
            .contract()
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| TxError::classify(e.to_string()))?;
        Ok(EvmTransaction::submitted(self.provider.clone(), *pending.tx_hash()).await)
    }

    async fn balance_of(&self, owner: Address) -> TxResult<U256> {
        self.contract()
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| TxError::classify(e.to_string()))
    }
}
