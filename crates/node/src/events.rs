//! Event topics and the derived event payloads.

use std::{sync::Arc, time::Duration};

use vigil_chainspec::Spec;
use vigil_primitives::{Finality, Peers, Slot, SyncState};

/// Topic name constants.
pub mod topics {
    // Upstream beacon events that are proxied.
    pub const ATTESTATION: &str = "attestation";
    pub const SINGLE_ATTESTATION: &str = "single_attestation";
    pub const BLOCK: &str = "block";
    pub const BLOCK_GOSSIP: &str = "block_gossip";
    pub const CHAIN_REORG: &str = "chain_reorg";
    pub const FINALIZED_CHECKPOINT: &str = "finalized_checkpoint";
    pub const HEAD: &str = "head";
    pub const VOLUNTARY_EXIT: &str = "voluntary_exit";
    pub const CONTRIBUTION_AND_PROOF: &str = "contribution_and_proof";
    pub const BLOB_SIDECAR: &str = "blob_sidecar";
    pub const DATA_COLUMN_SIDECAR: &str = "data_column_sidecar";
    /// The unclassified upstream envelope, emitted before the typed event.
    pub const RAW_EVENT: &str = "raw_event";

    // Derived events of the pseudo beacon node.
    pub const READY: &str = "ready";
    pub const SYNC_STATUS: &str = "sync_status";
    pub const NODE_VERSION_UPDATED: &str = "node_version_updated";
    pub const PEERS_UPDATED: &str = "peers_updated";
    pub const SPEC_UPDATED: &str = "spec_updated";
    pub const EMPTY_SLOT: &str = "slot_empty";
    pub const HEALTH_CHECK_SUCCEEDED: &str = "health_check_succeeded";
    pub const HEALTH_CHECK_FAILED: &str = "health_check_failed";
    pub const FINALITY_CHECKPOINT_UPDATED: &str = "finality_checkpoint_updated";
    pub const FIRST_TIME_HEALTHY: &str = "first_time_healthy";
}

/// Emitted once bootstrap completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadyEvent;

/// Emitted on every sync status refresh.
#[derive(Debug, Clone, Copy)]
pub struct SyncStatusEvent {
    pub state: SyncState,
}

/// Emitted on every node version refresh.
#[derive(Debug, Clone)]
pub struct NodeVersionUpdatedEvent {
    pub version: String,
}

/// Emitted on every peer list refresh.
#[derive(Debug, Clone)]
pub struct PeersUpdatedEvent {
    pub peers: Peers,
}

/// Emitted on every spec refresh.
#[derive(Debug, Clone)]
pub struct SpecUpdatedEvent {
    pub spec: Arc<Spec>,
}

/// Emitted when a slot is found to have no block.
#[derive(Debug, Clone, Copy)]
pub struct EmptySlotEvent {
    pub slot: Slot,
}

/// Emitted after each successful health check.
#[derive(Debug, Clone, Copy)]
pub struct HealthCheckSucceededEvent {
    pub duration: Duration,
}

/// Emitted after each failed health check.
#[derive(Debug, Clone, Copy)]
pub struct HealthCheckFailedEvent {
    pub duration: Duration,
}

/// Emitted when the head finality checkpoints change.
#[derive(Debug, Clone, Copy)]
pub struct FinalityCheckpointUpdatedEvent {
    pub finality: Finality,
}

/// Emitted once, the first time the node becomes healthy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTimeHealthyEvent;
