use serde::{Deserialize, Serialize};

use super::{
    header::LightClientHeader,
    sync_committee::{SyncAggregate, SyncCommittee},
};
use crate::{quantities::Slot, Root};

/// One entry of `/eth/v1/beacon/light_client/updates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub attested_header: LightClientHeader,
    pub next_sync_committee: SyncCommittee,
    pub next_sync_committee_branch: Vec<Root>,
    pub finalized_header: LightClientHeader,
    pub finality_branch: Vec<Root>,
    pub sync_aggregate: SyncAggregate,
    pub signature_slot: Slot,
}

/// The payload of `/eth/v1/beacon/light_client/finality_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityUpdate {
    pub attested_header: LightClientHeader,
    pub finalized_header: LightClientHeader,
    pub finality_branch: Vec<Root>,
    pub sync_aggregate: SyncAggregate,
    pub signature_slot: Slot,
}

/// The payload of `/eth/v1/beacon/light_client/optimistic_update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisticUpdate {
    pub attested_header: LightClientHeader,
    pub sync_aggregate: SyncAggregate,
    pub signature_slot: Slot,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn header(slot: u64) -> serde_json::Value {
        json!({
            "beacon": {
                "slot": slot.to_string(),
                "proposer_index": "1",
                "parent_root": "0x1111111111111111111111111111111111111111111111111111111111111111",
                "state_root": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "body_root": "0x3333333333333333333333333333333333333333333333333333333333333333"
            }
        })
    }

    fn aggregate() -> serde_json::Value {
        json!({
            "sync_committee_bits": format!("0x{}", "ff".repeat(64)),
            "sync_committee_signature": format!("0x{}", "4e".repeat(96)),
        })
    }

    #[test]
    fn update_round_trips() {
        let update: Update = serde_json::from_value(json!({
            "attested_header": header(1000),
            "next_sync_committee": {
                "pubkeys": [format!("0x{}", "01".repeat(48))],
                "aggregate_pubkey": format!("0x{}", "02".repeat(48)),
            },
            "next_sync_committee_branch": [
                "0x4444444444444444444444444444444444444444444444444444444444444444"
            ],
            "finalized_header": header(968),
            "finality_branch": [
                "0x5555555555555555555555555555555555555555555555555555555555555555"
            ],
            "sync_aggregate": aggregate(),
            "signature_slot": "1001"
        }))
        .unwrap();

        assert_eq!(update.signature_slot, Slot::new(1001));

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(serde_json::from_str::<Update>(&json).unwrap(), update);
    }

    #[test]
    fn finality_update_round_trips() {
        let update: FinalityUpdate = serde_json::from_value(json!({
            "attested_header": header(1000),
            "finalized_header": header(968),
            "finality_branch": [
                "0x5555555555555555555555555555555555555555555555555555555555555555"
            ],
            "sync_aggregate": aggregate(),
            "signature_slot": "1001"
        }))
        .unwrap();

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(
            serde_json::from_str::<FinalityUpdate>(&json).unwrap(),
            update
        );
    }

    #[test]
    fn optimistic_update_round_trips() {
        let update: OptimisticUpdate = serde_json::from_value(json!({
            "attested_header": header(1000),
            "sync_aggregate": aggregate(),
            "signature_slot": "1001"
        }))
        .unwrap();

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(
            serde_json::from_str::<OptimisticUpdate>(&json).unwrap(),
            update
        );
    }
}
