//! Transaction confirmation time estimates.
//!
//! Estimates are advisory only. A failed lookup yields `None` and never fails
//! the workflow.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::Chain;
use crate::port::{GasTracker, Transaction};

const POLYGON: Duration = Duration::from_millis(5_000);
const BSC: Duration = Duration::from_millis(10_000);
const FALLBACK: Duration = Duration::from_millis(30_000);

/// Chain-dependent estimate of how long a pending transaction takes to mine.
#[derive(Clone, Default)]
pub struct TransactionTimeEstimator {
    gas_tracker: Option<Arc<dyn GasTracker>>,
}

impl TransactionTimeEstimator {
    #[must_use]
    pub fn new(gas_tracker: Option<Arc<dyn GasTracker>>) -> Self {
        Self { gas_tracker }
    }

    /// Fixed estimate for chains that do not use a gas tracker.
    ///
    /// Returns `None` for Ethereum and Goerli, which need a lookup.
    #[must_use]
    pub const fn fixed_estimate(chain: Chain) -> Option<Duration> {
        match chain {
            Chain::Polygon => Some(POLYGON),
            Chain::Bsc => Some(BSC),
            Chain::Ethereum | Chain::Goerli => None,
            Chain::Other(_) => Some(FALLBACK),
        }
    }

    /// Estimate the confirmation time of `transaction` on `chain`.
    pub async fn estimate(&self, transaction: &Transaction, chain: Chain) -> Option<Duration> {
        if let Some(fixed) = Self::fixed_estimate(chain) {
            return Some(fixed);
        }

        let Some(tracker) = &self.gas_tracker else {
            return Some(FALLBACK);
        };
        let Some(gas_price) = transaction.gas_price() else {
            debug!(tx = %transaction.hash(), "No gas price on transaction, cannot estimate");
            return None;
        };

        match tracker.confirmation_time(chain, gas_price).await {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                debug!(chain = %chain.name(), error = %e, "Confirmation time lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::backend::ScriptedGasTracker;
    use crate::testkit::chain::ScriptedTransaction;

    fn tx() -> Transaction {
        ScriptedTransaction::confirmed(3)
            .with_gas_price(30_000_000_000)
            .into_transaction()
    }

    #[tokio::test]
    async fn fixed_chains() {
        let estimator = TransactionTimeEstimator::default();
        assert_eq!(estimator.estimate(&tx(), Chain::Polygon).await, Some(POLYGON));
        assert_eq!(estimator.estimate(&tx(), Chain::Bsc).await, Some(BSC));
        assert_eq!(
            estimator.estimate(&tx(), Chain::Other(42_161)).await,
            Some(Duration::from_millis(30_000))
        );
    }

    #[tokio::test]
    async fn ethereum_uses_tracker() {
        let tracker = Arc::new(ScriptedGasTracker::answering(Duration::from_secs(45)));
        let estimator = TransactionTimeEstimator::new(Some(tracker.clone()));

        assert_eq!(
            estimator.estimate(&tx(), Chain::Ethereum).await,
            Some(Duration::from_secs(45))
        );
        assert_eq!(tracker.lookups(), vec![(Chain::Ethereum, 30_000_000_000)]);
    }

    #[tokio::test]
    async fn failed_lookup_is_unknown() {
        let tracker = Arc::new(ScriptedGasTracker::failing("rate limited"));
        let estimator = TransactionTimeEstimator::new(Some(tracker));
        assert_eq!(estimator.estimate(&tx(), Chain::Goerli).await, None);
    }

    #[tokio::test]
    async fn ethereum_without_tracker_falls_back() {
        let estimator = TransactionTimeEstimator::new(None);
        assert_eq!(
            estimator.estimate(&tx(), Chain::Ethereum).await,
            Some(Duration::from_millis(30_000))
        );
    }
}
