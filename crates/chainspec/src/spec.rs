//! The parsed chain configuration.

use std::{collections::HashMap, time::Duration};

use alloy_primitives::U256;
use serde_json::Value;
use vigil_primitives::{Epoch, ForkName, Gwei, Slot};

use crate::{
    blob_schedule::{BlobSchedule, BlobScheduleEntry},
    fork_epoch::{ForkEpoch, ForkEpochs},
};

/// The raw key/value map served by `/eth/v1/config/spec`.
pub type RawSpec = serde_json::Map<String, Value>;

/// Chain configuration with the attributes the client computes from.
///
/// Parsing is tolerant: absent keys leave the field at its default and
/// unknown keys are ignored, matching how upstreams extend the config map
/// between releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spec {
    pub preset_base: String,
    pub config_name: String,

    pub deposit_chain_id: u64,
    pub deposit_network_id: u64,
    pub deposit_contract_address: String,

    pub safe_slots_to_update_justified: Slot,
    pub slots_per_epoch: u64,

    pub epochs_per_sync_committee_period: Epoch,
    pub min_sync_committee_participants: u64,
    pub target_committee_size: u64,
    pub sync_committee_size: u64,

    pub terminal_block_hash_activation_epoch: Epoch,
    pub terminal_total_difficulty: U256,

    pub max_validators_per_committee: u64,
    pub base_reward_factor: u64,
    pub effective_balance_increment: Gwei,
    pub max_effective_balance: Gwei,
    pub min_deposit_amount: Gwei,
    pub max_attestations: u64,

    pub seconds_per_eth1_block: Duration,
    pub genesis_delay: Duration,
    pub seconds_per_slot: Duration,
    pub max_deposits: u64,
    pub min_genesis_active_validator_count: u64,
    pub eth1_follow_distance: u64,

    pub fork_epochs: ForkEpochs,
    pub blob_schedule: BlobSchedule,
}

impl Spec {
    /// Parse a spec from the raw config map.
    pub fn from_raw(data: &RawSpec) -> Spec {
        let mut spec = Spec {
            preset_base: get_string(data, "PRESET_BASE"),
            config_name: get_string(data, "CONFIG_NAME"),
            deposit_chain_id: get_u64(data, "DEPOSIT_CHAIN_ID"),
            deposit_network_id: get_u64(data, "DEPOSIT_NETWORK_ID"),
            deposit_contract_address: get_string(data, "DEPOSIT_CONTRACT_ADDRESS"),
            safe_slots_to_update_justified: Slot::new(get_u64(
                data,
                "SAFE_SLOTS_TO_UPDATE_JUSTIFIED",
            )),
            slots_per_epoch: get_u64(data, "SLOTS_PER_EPOCH"),
            epochs_per_sync_committee_period: Epoch::new(get_u64(
                data,
                "EPOCHS_PER_SYNC_COMMITTEE_PERIOD",
            )),
            min_sync_committee_participants: get_u64(data, "MIN_SYNC_COMMITTEE_PARTICIPANTS"),
            target_committee_size: get_u64(data, "TARGET_COMMITTEE_SIZE"),
            sync_committee_size: get_u64(data, "SYNC_COMMITTEE_SIZE"),
            terminal_block_hash_activation_epoch: Epoch::new(get_u64(
                data,
                "TERMINAL_BLOCK_HASH_ACTIVATION_EPOCH",
            )),
            terminal_total_difficulty: get_u256(data, "TERMINAL_TOTAL_DIFFICULTY"),
            max_validators_per_committee: get_u64(data, "MAX_VALIDATORS_PER_COMMITTEE"),
            base_reward_factor: get_u64(data, "BASE_REWARD_FACTOR"),
            effective_balance_increment: Gwei::new(get_u64(data, "EFFECTIVE_BALANCE_INCREMENT")),
            max_effective_balance: Gwei::new(get_u64(data, "MAX_EFFECTIVE_BALANCE")),
            min_deposit_amount: Gwei::new(get_u64(data, "MIN_DEPOSIT_AMOUNT")),
            max_attestations: get_u64(data, "MAX_ATTESTATIONS"),
            seconds_per_eth1_block: Duration::from_secs(get_u64(data, "SECONDS_PER_ETH1_BLOCK")),
            genesis_delay: Duration::from_secs(get_u64(data, "GENESIS_DELAY")),
            seconds_per_slot: Duration::from_secs(get_u64(data, "SECONDS_PER_SLOT")),
            max_deposits: get_u64(data, "MAX_DEPOSITS"),
            min_genesis_active_validator_count: get_u64(
                data,
                "MIN_GENESIS_ACTIVE_VALIDATOR_COUNT",
            ),
            eth1_follow_distance: get_u64(data, "ETH1_FOLLOW_DISTANCE"),
            fork_epochs: harvest_fork_epochs(data),
            blob_schedule: harvest_blob_schedule(data),
        };

        // Keep the schedule deterministic for consumers that render it.
        spec.fork_epochs.0.sort_by_key(|fork| fork.name);

        spec
    }

    /// The maximum number of blobs a block may carry at the given epoch.
    pub fn max_blobs_per_block(&self, epoch: Epoch) -> u64 {
        self.blob_schedule.max_blobs_per_block(epoch)
    }
}

/// Collect `*_FORK_EPOCH` / `*_FORK_VERSION` keys into the fork schedule,
/// synthesizing a genesis entry at epoch 0 when the config names none.
fn harvest_fork_epochs(data: &RawSpec) -> ForkEpochs {
    let mut epochs: HashMap<String, Epoch> = HashMap::new();
    let mut versions: HashMap<String, String> = HashMap::new();

    epochs.insert("GENESIS".to_owned(), Epoch::new(0));

    for (key, value) in data {
        if let Some(name) = key.strip_suffix("_FORK_EPOCH") {
            epochs.insert(name.to_owned(), Epoch::new(value_to_u64(value)));
        }

        if let Some(name) = key.strip_suffix("_FORK_VERSION") {
            versions.insert(name.to_owned(), value_to_string(value));
        }
    }

    epochs
        .into_iter()
        .filter_map(|(name, epoch)| {
            // Names that do not map onto a known fork are dropped, the way
            // unknown config keys are.
            let fork: ForkName = name.parse().ok()?;

            Some(ForkEpoch {
                epoch,
                name: fork,
                version: versions.get(&name).cloned().unwrap_or_default(),
            })
        })
        .collect()
}

fn harvest_blob_schedule(data: &RawSpec) -> BlobSchedule {
    let Some(Value::Array(entries)) = data.get("BLOB_SCHEDULE") else {
        return BlobSchedule::default();
    };

    BlobSchedule(
        entries
            .iter()
            .filter_map(|entry| {
                let map = entry.as_object()?;

                Some(BlobScheduleEntry {
                    epoch: Epoch::new(value_to_u64(map.get("EPOCH")?)),
                    max_blobs_per_block: value_to_u64(map.get("MAX_BLOBS_PER_BLOCK")?),
                })
            })
            .collect(),
    )
}

fn get_u64(data: &RawSpec, key: &str) -> u64 {
    data.get(key).map(value_to_u64).unwrap_or_default()
}

fn get_string(data: &RawSpec, key: &str) -> String {
    data.get(key).map(value_to_string).unwrap_or_default()
}

fn get_u256(data: &RawSpec, key: &str) -> U256 {
    data.get(key)
        .map(value_to_string)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn value_to_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_default(),
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => 0,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
