//! Gossiped operations: exits, sync committee contributions, blob sidecars.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    block::SignedBeaconBlockHeader,
    quantities::{quoted_u64, Epoch, Slot, ValidatorIndex},
    BlsSignature, KzgCommitment, KzgProof, Root,
};

/// A voluntary exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoluntaryExit {
    pub epoch: Epoch,
    pub validator_index: ValidatorIndex,
}

/// A signed voluntary exit, as delivered on the `voluntary_exit` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BlsSignature,
}

/// A sync committee contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommitteeContribution {
    pub slot: Slot,
    pub beacon_block_root: Root,
    #[serde(with = "quoted_u64")]
    pub subcommittee_index: u64,
    pub aggregation_bits: Bytes,
    pub signature: BlsSignature,
}

/// A contribution together with the aggregator's proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionAndProof {
    pub aggregator_index: ValidatorIndex,
    pub contribution: SyncCommitteeContribution,
    pub selection_proof: BlsSignature,
}

/// The signed wrapper delivered on the `contribution_and_proof` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedContributionAndProof {
    pub message: ContributionAndProof,
    pub signature: BlsSignature,
}

/// A full blob sidecar from `/eth/v1/beacon/blob_sidecars/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobSidecar {
    #[serde(with = "quoted_u64")]
    pub index: u64,
    pub blob: Bytes,
    pub kzg_commitment: KzgCommitment,
    pub kzg_proof: KzgProof,
    pub signed_block_header: SignedBeaconBlockHeader,
    #[serde(default)]
    pub kzg_commitment_inclusion_proof: Vec<Root>,
}
