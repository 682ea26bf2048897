//! The node status holder.

use std::sync::RwLock;

use vigil_primitives::SyncState;

use crate::health::Health;

#[derive(Debug, Default)]
struct StatusState {
    network_id: u64,
    sync_state: Option<SyncState>,
}

/// Health plus the latest sync state and network id.
#[derive(Debug)]
pub struct Status {
    health: Health,
    state: RwLock<StatusState>,
}

impl Status {
    pub fn new(success_threshold: usize, fail_threshold: usize) -> Status {
        Status {
            health: Health::new(success_threshold, fail_threshold),
            state: RwLock::new(StatusState::default()),
        }
    }

    /// The health tracker.
    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Whether the upstream currently counts as healthy.
    pub fn healthy(&self) -> bool {
        self.health.healthy()
    }

    /// The network id, zero until learned from the spec.
    pub fn network_id(&self) -> u64 {
        self.state.read().map(|state| state.network_id).unwrap_or(0)
    }

    /// Whether the upstream reports itself as syncing. `false` until the
    /// first sync state arrives.
    pub fn syncing(&self) -> bool {
        self.state
            .read()
            .map(|state| {
                state
                    .sync_state
                    .map(|sync| sync.is_syncing)
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// The most recent sync state, if any was fetched.
    pub fn sync_state(&self) -> Option<SyncState> {
        self.state.read().ok().and_then(|state| state.sync_state)
    }

    pub fn update_network_id(&self, network_id: u64) {
        if let Ok(mut state) = self.state.write() {
            state.network_id = network_id;
        }
    }

    pub fn update_sync_state(&self, sync_state: Option<SyncState>) {
        if let Ok(mut state) = self.state.write() {
            state.sync_state = sync_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use vigil_primitives::Slot;

    use super::*;

    #[test]
    fn syncing_is_false_before_first_fetch() {
        let status = Status::new(3, 3);
        assert!(!status.syncing());
        assert!(status.sync_state().is_none());
    }

    #[test]
    fn reflects_latest_sync_state() {
        let status = Status::new(3, 3);

        status.update_sync_state(Some(SyncState {
            head_slot: Slot::new(10),
            sync_distance: Slot::new(90),
            is_syncing: true,
            is_optimistic: false,
            el_offline: None,
        }));
        assert!(status.syncing());

        status.update_sync_state(Some(SyncState {
            head_slot: Slot::new(100),
            sync_distance: Slot::new(0),
            is_syncing: false,
            is_optimistic: false,
            el_offline: None,
        }));
        assert!(!status.syncing());
        assert_eq!(status.sync_state().unwrap().head_slot, Slot::new(100));
    }

    #[test]
    fn network_id_updates() {
        let status = Status::new(3, 3);
        assert_eq!(status.network_id(), 0);

        status.update_network_id(1);
        assert_eq!(status.network_id(), 1);
    }
}
