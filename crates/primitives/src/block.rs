//! Beacon blocks, block headers and state envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    fork::ForkName,
    quantities::{Slot, ValidatorIndex},
    BlsSignature, Root,
};

/// An unsigned beacon block header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockHeaderMessage {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

/// A signed beacon block header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeaderMessage,
    pub signature: BlsSignature,
}

/// A block header entry of `/eth/v1/beacon/headers/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockHeader {
    pub root: Root,
    pub canonical: bool,
    pub header: SignedBeaconBlockHeader,
}

/// A signed beacon block with the body kept as raw JSON.
///
/// The body layout changes per fork; callers that need individual body
/// fields go through the count helpers or decode the body themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBeaconBlock {
    pub message: BeaconBlockMessage,
    pub signature: BlsSignature,
}

/// The message half of a signed beacon block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockMessage {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: Value,
}

/// A block tagged with the fork version it was served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedSignedBeaconBlock {
    pub version: ForkName,
    pub execution_optimistic: Option<bool>,
    pub finalized: Option<bool>,
    pub data: SignedBeaconBlock,
}

impl VersionedSignedBeaconBlock {
    pub const fn slot(&self) -> Slot {
        self.data.message.slot
    }

    /// Number of deposits carried in the block body.
    pub fn deposit_count(&self) -> usize {
        body_array_len(&self.data.message.body, "deposits")
    }

    /// Number of voluntary exits carried in the block body.
    pub fn voluntary_exit_count(&self) -> usize {
        body_array_len(&self.data.message.body, "voluntary_exits")
    }

    /// Number of execution transactions carried in the block body, zero
    /// before the merge.
    pub fn execution_transaction_count(&self) -> usize {
        self.data
            .message
            .body
            .get("execution_payload")
            .map(|payload| body_array_len(payload, "transactions"))
            .unwrap_or(0)
    }
}

fn body_array_len(value: &Value, key: &str) -> usize {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// A beacon state tagged with its fork version, body kept as raw JSON.
///
/// States are large and fork-shaped; the typed surface stops at the
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBeaconState {
    pub version: ForkName,
    pub data: Value,
}
