//! Payloads of the upstream server-sent-events topics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    quantities::{quoted_u64, Epoch, Slot},
    KzgCommitment, Root,
};

/// An upstream event before topic-specific decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub topic: String,
    pub data: Value,
}

/// The `head` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadEvent {
    pub slot: Slot,
    pub block: Root,
    pub state: Root,
    #[serde(default)]
    pub epoch_transition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_duty_dependent_root: Option<Root>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_duty_dependent_root: Option<Root>,
    #[serde(default)]
    pub execution_optimistic: bool,
}

/// The `block` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub slot: Slot,
    pub block: Root,
    #[serde(default)]
    pub execution_optimistic: bool,
}

/// The `block_gossip` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockGossipEvent {
    pub slot: Slot,
    pub block: Root,
}

/// The `chain_reorg` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReorgEvent {
    pub slot: Slot,
    #[serde(with = "quoted_u64")]
    pub depth: u64,
    pub old_head_block: Root,
    pub new_head_block: Root,
    pub old_head_state: Root,
    pub new_head_state: Root,
    pub epoch: Epoch,
    #[serde(default)]
    pub execution_optimistic: bool,
}

/// The `finalized_checkpoint` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedCheckpointEvent {
    pub block: Root,
    pub state: Root,
    pub epoch: Epoch,
    #[serde(default)]
    pub execution_optimistic: bool,
}

/// The `blob_sidecar` topic payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecarEvent {
    pub block_root: Root,
    #[serde(with = "quoted_u64")]
    pub index: u64,
    pub slot: Slot,
    pub kzg_commitment: KzgCommitment,
    pub versioned_hash: Root,
}

/// The `data_column_sidecar` topic payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataColumnSidecarEvent {
    pub block_root: Root,
    #[serde(with = "quoted_u64")]
    pub index: u64,
    pub slot: Slot,
    #[serde(default)]
    pub kzg_commitments: Vec<KzgCommitment>,
}
