//! New-block polling.

use std::time::Duration;

use alloy_provider::{DynProvider, Provider};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::adapter::outbound::feed::BlockFeed;
use crate::domain::TxError;
use crate::error::Result;

/// Poll the node for new blocks and publish their numbers into `feed`.
///
/// The returned task runs until aborted or until the node stops answering
/// the block filter.
///
/// # Errors
///
/// Returns an error if the block filter cannot be installed.
pub async fn watch_blocks(
    provider: DynProvider,
    feed: BlockFeed,
    poll_interval: Duration,
) -> Result<JoinHandle<()>> {
    let poller = provider
        .watch_blocks()
        .await
        .map_err(|e| TxError::transport(e.to_string()))?
        .with_poll_interval(poll_interval);

    Ok(tokio::spawn(async move {
        let mut hashes = poller.into_stream();
        while let Some(batch) = hashes.next().await {
            if batch.is_empty() {
                continue;
            }
            match provider.get_block_number().await {
                Ok(number) => {
                    feed.publish(number);
                }
                Err(e) => warn!(error = %e, "Block number lookup failed"),
            }
        }
        debug!("Block watcher stopped");
    }))
}
