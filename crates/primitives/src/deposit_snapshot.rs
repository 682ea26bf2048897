//! EIP-4881 deposit tree snapshots.

use serde::{Deserialize, Serialize};

use crate::{quantities::quoted_u64, Root};

/// The payload of `/eth/v1/beacon/deposit_snapshot`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSnapshot {
    #[serde(default)]
    pub finalized: Vec<Root>,
    pub deposit_root: Root,
    #[serde(with = "quoted_u64")]
    pub deposit_count: u64,
    pub execution_block_hash: Root,
    #[serde(with = "quoted_u64")]
    pub execution_block_height: u64,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    #[test]
    fn snapshot_round_trips() {
        let snapshot = DepositSnapshot {
            finalized: vec![
                b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
                b256!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            ],
            deposit_root: b256!("cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc"),
            deposit_count: 874_213,
            execution_block_hash: b256!(
                "dddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddddd"
            ),
            execution_block_height: 18_500_000,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"874213\""));
        assert_eq!(
            serde_json::from_str::<DepositSnapshot>(&json).unwrap(),
            snapshot
        );
    }
}
