//! Handler registration.
//!
//! Thin wrappers over the broker topics. Handler errors are logged by the
//! broker with the topic tag and never propagate to the emitter.

use std::future::Future;

use vigil_primitives::{
    BlobSidecarEvent, BlockEvent, BlockGossipEvent, ChainReorgEvent, DataColumnSidecarEvent,
    FinalizedCheckpointEvent, HeadEvent, RawEvent, SignedContributionAndProof,
    SignedVoluntaryExit, SingleAttestation, VersionedAttestation,
};

use crate::{
    broker::HandlerError,
    events::{
        EmptySlotEvent, FinalityCheckpointUpdatedEvent, FirstTimeHealthyEvent,
        HealthCheckFailedEvent, HealthCheckSucceededEvent, NodeVersionUpdatedEvent,
        PeersUpdatedEvent, ReadyEvent, SpecUpdatedEvent, SyncStatusEvent,
    },
    node::Node,
};

macro_rules! subscriptions {
    ($($(#[$doc:meta])* $fn_name:ident => $topic:ident : $event:ty,)+) => {
        impl Node {
            $(
                $(#[$doc])*
                pub fn $fn_name<F, Fut>(&self, handler: F)
                where
                    F: Fn($event) -> Fut + Send + Sync + 'static,
                    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
                {
                    self.inner.broker.$topic.on(handler);
                }
            )+
        }
    };
}

subscriptions! {
    /// Called for every upstream event, before its typed counterpart.
    on_event => raw_event: RawEvent,
    /// Called when an attestation is received.
    on_attestation => attestation: VersionedAttestation,
    /// Called when a single attestation is received.
    on_single_attestation => single_attestation: SingleAttestation,
    /// Called when a block is received.
    on_block => block: BlockEvent,
    /// Called when a block gossip is received.
    on_block_gossip => block_gossip: BlockGossipEvent,
    /// Called when a chain reorg is received.
    on_chain_reorg => chain_reorg: ChainReorgEvent,
    /// Called when a finalized checkpoint is received.
    on_finalized_checkpoint => finalized_checkpoint: FinalizedCheckpointEvent,
    /// Called when a head event is received.
    on_head => head: HeadEvent,
    /// Called when a voluntary exit is received.
    on_voluntary_exit => voluntary_exit: SignedVoluntaryExit,
    /// Called when a contribution and proof is received.
    on_contribution_and_proof => contribution_and_proof: SignedContributionAndProof,
    /// Called when a blob sidecar is received.
    on_blob_sidecar => blob_sidecar: BlobSidecarEvent,
    /// Called when a data column sidecar is received.
    on_data_column_sidecar => data_column_sidecar: DataColumnSidecarEvent,

    /// Called once the node finishes bootstrapping.
    on_ready => ready: ReadyEvent,
    /// Called on every sync status refresh.
    on_sync_status => sync_status: SyncStatusEvent,
    /// Called on every node version refresh.
    on_node_version_updated => node_version_updated: NodeVersionUpdatedEvent,
    /// Called on every peer list refresh.
    on_peers_updated => peers_updated: PeersUpdatedEvent,
    /// Called on every spec refresh.
    on_spec_updated => spec_updated: SpecUpdatedEvent,
    /// Called when an empty slot is detected.
    on_empty_slot => slot_empty: EmptySlotEvent,
    /// Called after each successful health check.
    on_health_check_succeeded => health_check_succeeded: HealthCheckSucceededEvent,
    /// Called after each failed health check.
    on_health_check_failed => health_check_failed: HealthCheckFailedEvent,
    /// Called when the head finality checkpoints change.
    on_finality_checkpoint_updated => finality_checkpoint_updated: FinalityCheckpointUpdatedEvent,
    /// Called once, the first time the node becomes healthy.
    on_first_time_healthy => first_time_healthy: FirstTimeHealthyEvent,
}
