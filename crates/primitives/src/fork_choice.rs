//! The fork choice context dump.

use serde::{Deserialize, Serialize};

use crate::{
    checkpoint::Checkpoint,
    quantities::{quoted_u64, Epoch, Slot},
    Root,
};

/// The payload of `/eth/v1/debug/fork_choice`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkChoice {
    pub justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
    #[serde(default)]
    pub fork_choice_nodes: Vec<ForkChoiceNode>,
}

/// A single node of the fork choice tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkChoiceNode {
    pub slot: Slot,
    pub block_root: Root,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_root: Option<Root>,
    pub justified_epoch: Epoch,
    pub finalized_epoch: Epoch,
    #[serde(with = "quoted_u64")]
    pub weight: u64,
    pub validity: String,
    pub execution_block_hash: Root,
}
