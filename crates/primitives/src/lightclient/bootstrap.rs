use serde::{Deserialize, Serialize};

use super::{header::LightClientHeader, sync_committee::SyncCommittee};
use crate::Root;

/// The payload of `/eth/v1/beacon/light_client/bootstrap/{root}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bootstrap {
    pub header: LightClientHeader,
    pub current_sync_committee: SyncCommittee,
    pub current_sync_committee_branch: Vec<Root>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::quantities::Slot;

    #[test]
    fn bootstrap_round_trips() {
        let bootstrap: Bootstrap = serde_json::from_value(json!({
            "header": {
                "beacon": {
                    "slot": "6000000",
                    "proposer_index": "911",
                    "parent_root": "0x1111111111111111111111111111111111111111111111111111111111111111",
                    "state_root": "0x2222222222222222222222222222222222222222222222222222222222222222",
                    "body_root": "0x3333333333333333333333333333333333333333333333333333333333333333"
                }
            },
            "current_sync_committee": {
                "pubkeys": [format!("0x{}", "01".repeat(48)), format!("0x{}", "02".repeat(48))],
                "aggregate_pubkey": format!("0x{}", "03".repeat(48)),
            },
            "current_sync_committee_branch": [
                "0x4444444444444444444444444444444444444444444444444444444444444444",
                "0x5555555555555555555555555555555555555555555555555555555555555555"
            ]
        }))
        .unwrap();

        assert_eq!(bootstrap.header.beacon.slot, Slot::new(6_000_000));
        assert_eq!(bootstrap.current_sync_committee.pubkeys.len(), 2);
        assert_eq!(bootstrap.current_sync_committee_branch.len(), 2);

        let json = serde_json::to_string(&bootstrap).unwrap();
        assert_eq!(serde_json::from_str::<Bootstrap>(&json).unwrap(), bootstrap);
    }
}
