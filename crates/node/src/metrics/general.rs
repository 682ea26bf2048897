//! General node metrics: version, peers and finality checkpoints.

use ::metrics::gauge;
use vigil_primitives::{PeerDirection, PeerState};

use super::Instruments;
use crate::node::Node;

pub(crate) fn start(node: &Node, instruments: Instruments) {
    let version_instruments = instruments.clone();
    node.on_node_version_updated(move |event| {
        let instruments = version_instruments.clone();
        async move {
            gauge!(
                instruments.name("node_version"),
                "node" => instruments.node_label(),
                "version" => event.version.clone(),
            )
            .set(1.0);

            Ok(())
        }
    });

    let peers_instruments = instruments.clone();
    node.on_peers_updated(move |event| {
        let instruments = peers_instruments.clone();
        async move {
            for state in PeerState::ALL {
                for direction in PeerDirection::ALL {
                    let count = event.peers.by_state_and_direction(state, direction).len();

                    gauge!(
                        instruments.name("peers"),
                        "node" => instruments.node_label(),
                        "state" => state.as_str(),
                        "direction" => direction.as_str(),
                    )
                    .set(count as f64);
                }
            }

            for (agent, count) in event.peers.agent_count() {
                gauge!(
                    instruments.name("peer_agents"),
                    "node" => instruments.node_label(),
                    "agent" => agent.as_str(),
                )
                .set(count as f64);
            }

            Ok(())
        }
    });

    node.on_finality_checkpoint_updated(move |event| {
        let instruments = instruments.clone();
        async move {
            let finality = event.finality;

            for (checkpoint, epoch) in [
                ("finalized", finality.finalized.epoch),
                ("justified", finality.justified.epoch),
                ("previous_justified", finality.previous_justified.epoch),
            ] {
                gauge!(
                    instruments.name("finality_epoch"),
                    "node" => instruments.node_label(),
                    "checkpoint" => checkpoint,
                )
                .set(epoch.as_u64() as f64);
            }

            Ok(())
        }
    });
}
