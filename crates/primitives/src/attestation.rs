//! Attestations across fork versions.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    checkpoint::Checkpoint,
    fork::ForkName,
    quantities::{CommitteeIndex, Slot, ValidatorIndex},
    BlsSignature, Root,
};

/// The data every attestation commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: CommitteeIndex,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

/// A phase0 aggregate attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub aggregation_bits: Bytes,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

/// An electra aggregate attestation, carrying committee bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectraAttestation {
    pub aggregation_bits: Bytes,
    pub data: AttestationData,
    pub signature: BlsSignature,
    pub committee_bits: Bytes,
}

/// An electra single (unaggregated) attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleAttestation {
    pub committee_index: CommitteeIndex,
    pub attester_index: ValidatorIndex,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

/// An attestation tagged with the fork shape it arrived in.
///
/// The untagged deserialization tries electra first: the electra shape is a
/// strict superset of phase0, so the order decides which one sticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionedAttestation {
    Electra(ElectraAttestation),
    Phase0(Attestation),
}

impl VersionedAttestation {
    pub const fn version(&self) -> ForkName {
        match self {
            VersionedAttestation::Electra(_) => ForkName::Electra,
            VersionedAttestation::Phase0(_) => ForkName::Phase0,
        }
    }

    pub const fn is_electra(&self) -> bool {
        matches!(self, VersionedAttestation::Electra(_))
    }

    pub const fn data(&self) -> &AttestationData {
        match self {
            VersionedAttestation::Electra(att) => &att.data,
            VersionedAttestation::Phase0(att) => &att.data,
        }
    }

    pub const fn slot(&self) -> Slot {
        self.data().slot
    }

    pub const fn source(&self) -> &Checkpoint {
        &self.data().source
    }

    pub const fn target(&self) -> &Checkpoint {
        &self.data().target
    }

    pub const fn signature(&self) -> &BlsSignature {
        match self {
            VersionedAttestation::Electra(att) => &att.signature,
            VersionedAttestation::Phase0(att) => &att.signature,
        }
    }

    pub const fn aggregation_bits(&self) -> &Bytes {
        match self {
            VersionedAttestation::Electra(att) => &att.aggregation_bits,
            VersionedAttestation::Phase0(att) => &att.aggregation_bits,
        }
    }
}
