use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{BlsPublicKey, BlsSignature};

/// A sync committee: member pubkeys plus the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommittee {
    pub pubkeys: Vec<BlsPublicKey>,
    pub aggregate_pubkey: BlsPublicKey,
}

/// A sync aggregate: participation bits plus the aggregate signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAggregate {
    pub sync_committee_bits: Bytes,
    pub sync_committee_signature: BlsSignature,
}
