//! Sync status metrics.

use ::metrics::gauge;

use super::Instruments;
use crate::node::Node;

pub(crate) fn start(node: &Node, instruments: Instruments) {
    node.on_sync_status(move |event| {
        let instruments = instruments.clone();
        async move {
            let status = event.state;

            set(&instruments, "head_slot", status.head_slot.as_u64() as f64);
            set(
                &instruments,
                "distance",
                status.sync_distance.as_u64() as f64,
            );
            set(
                &instruments,
                "is_syncing",
                if status.is_syncing { 1.0 } else { 0.0 },
            );
            set(
                &instruments,
                "is_optimistic",
                if status.is_optimistic { 1.0 } else { 0.0 },
            );

            let estimated_highest = status.estimated_highest_slot().as_u64();
            set(
                &instruments,
                "estimated_highest_slot",
                estimated_highest as f64,
            );

            let percent = if !status.is_syncing || estimated_highest == 0 {
                100.0
            } else {
                status.head_slot.as_u64() as f64 / estimated_highest as f64 * 100.0
            };
            set(&instruments, "percentage", percent);

            Ok(())
        }
    });
}

fn set(instruments: &Instruments, suffix: &str, value: f64) {
    gauge!(
        instruments.name(suffix),
        "node" => instruments.node_label(),
    )
    .set(value);
}
