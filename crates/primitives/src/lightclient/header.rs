use serde::{Deserialize, Serialize};

use crate::block::BeaconBlockHeaderMessage;

/// A light client header wrapping the attested beacon block header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightClientHeader {
    pub beacon: BeaconBlockHeaderMessage,
}
