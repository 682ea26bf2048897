//! Node sync status.

use serde::{Deserialize, Serialize};

use crate::quantities::Slot;

/// The sync snapshot reported by `/eth/v1/node/syncing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub head_slot: Slot,
    pub sync_distance: Slot,
    pub is_syncing: bool,
    #[serde(default)]
    pub is_optimistic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub el_offline: Option<bool>,
}

impl SyncState {
    /// The network head slot estimated from head + distance.
    pub const fn estimated_highest_slot(&self) -> Slot {
        Slot::new(self.head_slot.as_u64() + self.sync_distance.as_u64())
    }
}
