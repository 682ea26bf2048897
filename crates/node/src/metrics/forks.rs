//! Fork schedule metrics: per-fork epochs, activation and the current fork.

use ::metrics::gauge;
use tracing::debug;

use super::Instruments;
use crate::node::Node;

pub(crate) fn start(node: &Node, instruments: Instruments) {
    // The wall clock only exists after bootstrap, so the epoch-changed
    // wiring waits for the ready signal.
    let node = node.clone();
    let ready_node = node.clone();
    ready_node.on_ready(move |_event| {
        let node = node.clone();
        let instruments = instruments.clone();
        async move {
            observe_forks(&node, &instruments);

            let clock = node.wallclock()?;
            clock.on_epoch_changed(move |_epoch| {
                let node = node.clone();
                let instruments = instruments.clone();
                async move {
                    observe_forks(&node, &instruments);
                }
            });

            Ok(())
        }
    });
}

fn observe_forks(node: &Node, instruments: &Instruments) {
    let Ok(spec) = node.spec() else {
        debug!("spec not yet available for fork metrics");
        return;
    };

    let Ok(clock) = node.wallclock() else {
        return;
    };

    let epoch = clock.current_epoch();

    for fork in spec.fork_epochs.iter() {
        gauge!(
            instruments.name("epoch"),
            "node" => instruments.node_label(),
            "fork" => fork.name.to_string(),
        )
        .set(fork.epoch.as_u64() as f64);

        gauge!(
            instruments.name("activated"),
            "node" => instruments.node_label(),
            "fork" => fork.name.to_string(),
        )
        .set(if fork.active_at(epoch) { 1.0 } else { 0.0 });
    }

    match spec.fork_epochs.current_fork(epoch) {
        Ok(current) => {
            for fork in spec.fork_epochs.iter() {
                gauge!(
                    instruments.name("current"),
                    "node" => instruments.node_label(),
                    "fork" => fork.name.to_string(),
                )
                .set(if fork.name == current.name { 1.0 } else { 0.0 });
            }
        }
        Err(err) => {
            debug!(error = %err, "failed to resolve current fork");
        }
    }
}
