//! Chain genesis information.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{quantities::quoted_u64, ForkVersion, Root};

/// The payload of `/eth/v1/beacon/genesis`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Genesis time as unix seconds.
    #[serde(with = "quoted_u64")]
    pub genesis_time: u64,
    pub genesis_validators_root: Root,
    pub genesis_fork_version: ForkVersion,
}

impl Genesis {
    /// Genesis time as a `SystemTime`.
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.genesis_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mainnet_shape() {
        let genesis: Genesis = serde_json::from_str(
            r#"{
                "genesis_time": "1606824023",
                "genesis_validators_root": "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95",
                "genesis_fork_version": "0x00000000"
            }"#,
        )
        .unwrap();

        assert_eq!(genesis.genesis_time, 1_606_824_023);
        assert_eq!(
            genesis.time(),
            UNIX_EPOCH + Duration::from_secs(1_606_824_023)
        );
    }
}
