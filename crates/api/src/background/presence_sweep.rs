//! Periodic presence table compaction.
//!
//! Counting is already lazy over the stored timestamps; this task only
//! reclaims memory from clients that stopped pinging.

use std::sync::Arc;
use std::time::Duration;

use limacentro_core::presence::PresenceTracker;
use tokio_util::sync::CancellationToken;

/// Sweep the tracker once per TTL until cancelled.
pub async fn run(presence: Arc<PresenceTracker>, ttl_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(ttl_secs.max(1)));
    // The first tick fires immediately and there is nothing to sweep yet.
    interval.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("presence sweep task stopping");
                break;
            }
            _ = interval.tick() => {
                let purged = presence.sweep();
                if purged > 0 {
                    tracing::debug!(purged, "swept expired presence entries");
                }
            }
        }
    }
}
