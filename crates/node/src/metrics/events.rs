//! Event flow metrics: per-topic counts and stream liveness.

use std::time::Duration;

use ::metrics::{counter, gauge};
use tokio_util::sync::CancellationToken;

use super::Instruments;
use crate::node::Node;

pub(crate) fn start(node: &Node, instruments: Instruments, token: &CancellationToken) {
    let count_instruments = instruments.clone();
    node.on_event(move |event| {
        let instruments = count_instruments.clone();
        async move {
            counter!(
                instruments.name("count"),
                "node" => instruments.node_label(),
                "event" => event.topic.clone(),
            )
            .increment(1);

            gauge!(
                instruments.name("time_since_last_subscription_event_ms"),
                "node" => instruments.node_label(),
            )
            .set(0.0);

            Ok(())
        }
    });

    // Refresh the liveness gauge once a second from the recorded event time.
    let node = node.clone();
    let token = token.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {}
            }

            if let Some(elapsed) = node.time_since_last_event() {
                gauge!(
                    instruments.name("time_since_last_subscription_event_ms"),
                    "node" => instruments.node_label(),
                )
                .set(elapsed.as_millis() as f64);
            }
        }
    });
}
