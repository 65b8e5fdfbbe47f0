//! Gas tracker port for confirmation time estimates.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Chain;
use crate::error::Result;

/// Third-party source of expected confirmation times.
#[async_trait]
pub trait GasTracker: Send + Sync {
    /// Expected time until a transaction paying `gas_price` wei is mined.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is not covered or the lookup fails.
    async fn confirmation_time(&self, chain: Chain, gas_price: u128) -> Result<Duration>;
}
