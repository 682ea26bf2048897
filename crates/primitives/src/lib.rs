//! Data model for the Ethereum beacon node HTTP API.
//!
//! Everything in this crate round-trips through the JSON encoding the beacon
//! API uses on the wire: 64-bit integers are decimal strings, fixed-length
//! byte values are 0x-prefixed hex.

pub mod attestation;
pub mod block;
pub mod checkpoint;
pub mod deposit_snapshot;
pub mod events;
pub mod fork;
pub mod fork_choice;
pub mod genesis;
pub mod identity;
pub mod lightclient;
pub mod operations;
pub mod peer;
pub mod quantities;
pub mod sync_state;
pub mod validator;

pub use attestation::{
    Attestation, AttestationData, ElectraAttestation, SingleAttestation, VersionedAttestation,
};
pub use block::{
    BeaconBlockHeader, BeaconBlockHeaderMessage, SignedBeaconBlock, SignedBeaconBlockHeader,
    VersionedBeaconState, VersionedSignedBeaconBlock,
};
pub use checkpoint::{Checkpoint, Finality};
pub use deposit_snapshot::DepositSnapshot;
pub use events::{
    BlobSidecarEvent, BlockEvent, BlockGossipEvent, ChainReorgEvent, DataColumnSidecarEvent,
    FinalizedCheckpointEvent, HeadEvent, RawEvent,
};
pub use fork::ForkName;
pub use fork_choice::{ForkChoice, ForkChoiceNode};
pub use genesis::Genesis;
pub use identity::Identity;
pub use operations::{
    BlobSidecar, ContributionAndProof, SignedContributionAndProof, SignedVoluntaryExit,
    SyncCommitteeContribution, VoluntaryExit,
};
pub use peer::{Agent, Peer, PeerCount, PeerDirection, PeerState, Peers};
pub use quantities::{CommitteeIndex, Epoch, Gwei, Slot, ValidatorIndex};
pub use sync_state::SyncState;
pub use validator::{BeaconCommittee, ProposerDuty, Validator, ValidatorStatus};

/// A 32-byte merkle root.
pub type Root = alloy_primitives::B256;

/// A 48-byte BLS public key.
pub type BlsPublicKey = alloy_primitives::FixedBytes<48>;

/// A 96-byte BLS signature.
pub type BlsSignature = alloy_primitives::FixedBytes<96>;

/// A 48-byte KZG commitment.
pub type KzgCommitment = alloy_primitives::FixedBytes<48>;

/// A 48-byte KZG proof.
pub type KzgProof = alloy_primitives::FixedBytes<48>;

/// A 4-byte fork version.
pub type ForkVersion = alloy_primitives::FixedBytes<4>;
