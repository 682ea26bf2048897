//! Validators, duties and committees.

use serde::{Deserialize, Serialize};

use crate::{
    quantities::{CommitteeIndex, Epoch, Gwei, Slot, ValidatorIndex},
    BlsPublicKey, Root,
};

/// Lifecycle status of a validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorStatus {
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveExiting,
    ActiveSlashed,
    ExitedUnslashed,
    ExitedSlashed,
    WithdrawalPossible,
    WithdrawalDone,
    #[serde(other)]
    Unknown,
}

/// A single entry of `/eth/v1/beacon/states/{id}/validators`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub index: ValidatorIndex,
    pub balance: Gwei,
    pub status: ValidatorStatus,
    pub validator: ValidatorDetails,
}

/// The on-chain validator record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDetails {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: Root,
    pub effective_balance: Gwei,
    pub slashed: bool,
    pub activation_eligibility_epoch: Epoch,
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
}

/// A proposer duty assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposerDuty {
    pub pubkey: BlsPublicKey,
    pub validator_index: ValidatorIndex,
    pub slot: Slot,
}

/// A beacon committee assignment for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconCommittee {
    pub index: CommitteeIndex,
    pub slot: Slot,
    pub validators: Vec<ValidatorIndex>,
}
