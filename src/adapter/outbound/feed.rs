//! In-process block feed.

use tokio::sync::broadcast;
use tracing::trace;

use crate::port::{BlockNotifier, BlockSubscription};

const CAPACITY: usize = 64;

/// Fan-out of block numbers to every subscriber.
///
/// The EVM block watcher publishes into a feed; tests publish directly.
#[derive(Debug, Clone)]
pub struct BlockFeed {
    sender: broadcast::Sender<u64>,
}

impl BlockFeed {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Announce a new block. Returns the number of live subscribers.
    pub fn publish(&self, block: u64) -> usize {
        let delivered = self.sender.send(block).unwrap_or(0);
        trace!(block, delivered, "Published block");
        delivered
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BlockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockNotifier for BlockFeed {
    fn subscribe(&self) -> BlockSubscription {
        BlockSubscription::new(self.sender.subscribe())
    }
}
