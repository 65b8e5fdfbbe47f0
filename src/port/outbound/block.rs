//! New-block notifications.
//!
//! Revalidation is push-based: consumers hold a [`BlockSubscription`] for as
//! long as they need updates and release it by dropping it or calling
//! [`BlockSubscription::unsubscribe`].

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

/// Source of new-block events for the active chain.
pub trait BlockNotifier: Send + Sync {
    /// Start receiving block numbers as they are observed.
    fn subscribe(&self) -> BlockSubscription;
}

/// A live subscription to new blocks.
#[derive(Debug)]
pub struct BlockSubscription {
    receiver: broadcast::Receiver<u64>,
}

impl BlockSubscription {
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<u64>) -> Self {
        Self { receiver }
    }

    /// Wait for the next block number. `None` once the notifier shuts down.
    ///
    /// A subscriber that falls behind skips to the most recent blocks: only
    /// the fact that a new block arrived matters for revalidation.
    pub async fn next_block(&mut self) -> Option<u64> {
        loop {
            match self.receiver.recv().await {
                Ok(block) => return Some(block),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Block subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Release the subscription.
    pub fn unsubscribe(self) {}
}
