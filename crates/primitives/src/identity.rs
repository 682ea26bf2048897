//! Node identity.

use serde::{Deserialize, Serialize};

use crate::quantities::quoted_u64;

/// The payload of `/eth/v1/node/identity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub peer_id: String,
    pub enr: String,
    #[serde(default)]
    pub p2p_addresses: Vec<String>,
    #[serde(default)]
    pub discovery_addresses: Vec<String>,
    #[serde(default)]
    pub metadata: IdentityMetadata,
}

/// The p2p metadata advertised by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    #[serde(with = "quoted_u64")]
    pub seq_number: u64,
    #[serde(default)]
    pub attnets: String,
    #[serde(default)]
    pub syncnets: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips() {
        let identity: Identity = serde_json::from_str(
            r#"{
                "peer_id": "16Uiu2HAmQ",
                "enr": "enr:-abc",
                "p2p_addresses": ["/ip4/7.7.7.7/tcp/9000/p2p/16Uiu2HAmQ"],
                "discovery_addresses": ["/ip4/7.7.7.7/udp/9000/p2p/16Uiu2HAmQ"],
                "metadata": {"seq_number": "42", "attnets": "0xffff", "syncnets": "0x0f"}
            }"#,
        )
        .unwrap();

        assert_eq!(identity.metadata.seq_number, 42);

        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(serde_json::from_str::<Identity>(&json).unwrap(), identity);
    }
}
