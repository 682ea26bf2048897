//! Fixed-cadence refresh jobs.
//!
//! Each job runs on its own task, so a slow refresh cannot delay another.
//! Missed ticks are skipped rather than caught up.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::node::Node;

const SYNC_STATUS_INTERVAL: Duration = Duration::from_secs(15);
const NODE_VERSION_INTERVAL: Duration = Duration::from_secs(15 * 60);
const PEERS_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) fn spawn_periodic_jobs(node: &Node, token: &CancellationToken) {
    let health_interval = node.options().health_check.interval;

    spawn_job(node, token, health_interval, |node| async move {
        node.run_health_check().await;
    });

    spawn_job(node, token, SYNC_STATUS_INTERVAL, |node| async move {
        if let Err(err) = node.fetch_sync_status().await {
            debug!(error = %err, "failed to fetch sync status");
        }
    });

    spawn_job(node, token, NODE_VERSION_INTERVAL, |node| async move {
        if let Err(err) = node.fetch_node_version().await {
            debug!(error = %err, "failed to fetch node version");
        }
    });

    spawn_job(node, token, PEERS_INTERVAL, |node| async move {
        if let Err(err) = node.fetch_peers().await {
            debug!(error = %err, "failed to fetch peers");
        }
    });
}

fn spawn_job<F, Fut>(node: &Node, token: &CancellationToken, interval: Duration, run: F)
where
    F: Fn(Node) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let node = node.clone();
    let token = token.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {}
            }

            run(node.clone()).await;
        }
    });
}
