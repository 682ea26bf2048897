//! Capability traits for the upstream beacon node.
//!
//! One trait per capability. Every method defaults to
//! [`ApiError::Unsupported`], so a client only advertises the capabilities
//! it actually implements.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use vigil_primitives::{
    AttestationData, BeaconBlockHeader, BeaconCommittee, BlobSidecar, BlsPublicKey,
    DepositSnapshot, Epoch, Finality, ForkChoice, Genesis, Identity, Peer, PeerCount, Peers,
    ProposerDuty, RawEvent, Root, Slot, SyncState, Validator, ValidatorIndex,
    VersionedBeaconState, VersionedSignedBeaconBlock,
};
use vigil_primitives::{
    lightclient::{Bootstrap, FinalityUpdate, OptimisticUpdate, Update},
    CommitteeIndex,
};

use crate::{error::ApiError, response::VersionedResponse};

/// The raw key/value chain configuration map.
pub type RawSpec = serde_json::Map<String, serde_json::Value>;

/// A stream of raw upstream events.
pub type EventStream = BoxStream<'static, Result<RawEvent, ApiError>>;

#[async_trait]
pub trait SyncStateProvider: Send + Sync {
    async fn sync_state(&self) -> Result<SyncState, ApiError> {
        Err(ApiError::Unsupported("sync state"))
    }
}

#[async_trait]
pub trait NodeVersionProvider: Send + Sync {
    async fn node_version(&self) -> Result<String, ApiError> {
        Err(ApiError::Unsupported("node version"))
    }
}

#[async_trait]
pub trait SpecProvider: Send + Sync {
    async fn raw_spec(&self) -> Result<RawSpec, ApiError> {
        Err(ApiError::Unsupported("spec"))
    }
}

#[async_trait]
pub trait GenesisProvider: Send + Sync {
    async fn genesis(&self) -> Result<Genesis, ApiError> {
        Err(ApiError::Unsupported("genesis"))
    }
}

#[async_trait]
pub trait FinalityProvider: Send + Sync {
    async fn finality(&self, _state_id: &str) -> Result<Finality, ApiError> {
        Err(ApiError::Unsupported("finality"))
    }
}

#[async_trait]
pub trait SignedBeaconBlockProvider: Send + Sync {
    /// Fetch a block. Returns `None` when the slot has no block (404); this
    /// is the contract empty-slot detection relies on.
    async fn signed_beacon_block(
        &self,
        _block_id: &str,
    ) -> Result<Option<VersionedSignedBeaconBlock>, ApiError> {
        Err(ApiError::Unsupported("signed beacon block"))
    }
}

#[async_trait]
pub trait BeaconBlockRootProvider: Send + Sync {
    async fn beacon_block_root(&self, _block_id: &str) -> Result<Root, ApiError> {
        Err(ApiError::Unsupported("beacon block root"))
    }
}

#[async_trait]
pub trait BeaconStateProvider: Send + Sync {
    async fn beacon_state(&self, _state_id: &str) -> Result<VersionedBeaconState, ApiError> {
        Err(ApiError::Unsupported("beacon state"))
    }
}

#[async_trait]
pub trait BeaconStateRootProvider: Send + Sync {
    async fn beacon_state_root(&self, _state_id: &str) -> Result<Root, ApiError> {
        Err(ApiError::Unsupported("beacon state root"))
    }
}

#[async_trait]
pub trait BlobSidecarsProvider: Send + Sync {
    async fn blob_sidecars(&self, _block_id: &str) -> Result<Vec<BlobSidecar>, ApiError> {
        Err(ApiError::Unsupported("blob sidecars"))
    }
}

#[async_trait]
pub trait ProposerDutiesProvider: Send + Sync {
    async fn proposer_duties(&self, _epoch: Epoch) -> Result<Vec<ProposerDuty>, ApiError> {
        Err(ApiError::Unsupported("proposer duties"))
    }
}

#[async_trait]
pub trait ForkChoiceProvider: Send + Sync {
    async fn fork_choice(&self) -> Result<ForkChoice, ApiError> {
        Err(ApiError::Unsupported("fork choice"))
    }
}

#[async_trait]
pub trait BeaconCommitteesProvider: Send + Sync {
    async fn beacon_committees(
        &self,
        _state_id: &str,
        _epoch: Option<Epoch>,
    ) -> Result<Vec<BeaconCommittee>, ApiError> {
        Err(ApiError::Unsupported("beacon committees"))
    }
}

#[async_trait]
pub trait AttestationDataProvider: Send + Sync {
    async fn attestation_data(
        &self,
        _slot: Slot,
        _committee_index: CommitteeIndex,
    ) -> Result<AttestationData, ApiError> {
        Err(ApiError::Unsupported("attestation data"))
    }
}

#[async_trait]
pub trait ValidatorsProvider: Send + Sync {
    async fn validators(
        &self,
        _state_id: &str,
        _indices: &[ValidatorIndex],
        _pubkeys: &[BlsPublicKey],
    ) -> Result<HashMap<ValidatorIndex, Validator>, ApiError> {
        Err(ApiError::Unsupported("validators"))
    }
}

#[async_trait]
pub trait BeaconBlockHeadersProvider: Send + Sync {
    async fn beacon_block_header(&self, _block_id: &str) -> Result<BeaconBlockHeader, ApiError> {
        Err(ApiError::Unsupported("beacon block headers"))
    }
}

#[async_trait]
pub trait EventsProvider: Send + Sync {
    /// Open a server-sent-events subscription for a single topic.
    async fn subscribe(&self, _topic: &str) -> Result<EventStream, ApiError> {
        Err(ApiError::Unsupported("events"))
    }
}

/// The REST shim: endpoints outside the typed capability set.
#[async_trait]
pub trait NodeApiProvider: Send + Sync {
    async fn node_peers(&self) -> Result<Peers, ApiError> {
        Err(ApiError::Unsupported("node peers"))
    }

    async fn node_peer(&self, _peer_id: &str) -> Result<Peer, ApiError> {
        Err(ApiError::Unsupported("node peer"))
    }

    async fn node_peer_count(&self) -> Result<PeerCount, ApiError> {
        Err(ApiError::Unsupported("node peer count"))
    }

    async fn node_identity(&self) -> Result<Identity, ApiError> {
        Err(ApiError::Unsupported("node identity"))
    }

    async fn deposit_snapshot(&self) -> Result<DepositSnapshot, ApiError> {
        Err(ApiError::Unsupported("deposit snapshot"))
    }

    async fn raw_block(&self, _block_id: &str, _content_type: &str) -> Result<Vec<u8>, ApiError> {
        Err(ApiError::Unsupported("raw block"))
    }

    async fn raw_debug_beacon_state(
        &self,
        _state_id: &str,
        _content_type: &str,
    ) -> Result<Vec<u8>, ApiError> {
        Err(ApiError::Unsupported("raw debug beacon state"))
    }

    async fn light_client_bootstrap(
        &self,
        _block_root: &str,
    ) -> Result<VersionedResponse<Bootstrap>, ApiError> {
        Err(ApiError::Unsupported("light client bootstrap"))
    }

    async fn light_client_updates(
        &self,
        _start_period: u64,
        _count: u64,
    ) -> Result<Vec<Update>, ApiError> {
        Err(ApiError::Unsupported("light client updates"))
    }

    async fn light_client_finality_update(
        &self,
    ) -> Result<VersionedResponse<FinalityUpdate>, ApiError> {
        Err(ApiError::Unsupported("light client finality update"))
    }

    async fn light_client_optimistic_update(
        &self,
    ) -> Result<VersionedResponse<OptimisticUpdate>, ApiError> {
        Err(ApiError::Unsupported("light client optimistic update"))
    }
}

/// The full capability surface the node façade consumes.
///
/// Blanket-implemented, so a type opts in by implementing the individual
/// capability traits; unimplemented ones keep their `Unsupported` defaults.
pub trait UpstreamClient:
    SyncStateProvider
    + NodeVersionProvider
    + SpecProvider
    + GenesisProvider
    + FinalityProvider
    + SignedBeaconBlockProvider
    + BeaconBlockRootProvider
    + BeaconStateProvider
    + BeaconStateRootProvider
    + BlobSidecarsProvider
    + ProposerDutiesProvider
    + ForkChoiceProvider
    + BeaconCommitteesProvider
    + AttestationDataProvider
    + ValidatorsProvider
    + BeaconBlockHeadersProvider
    + EventsProvider
    + NodeApiProvider
{
}

impl<T> UpstreamClient for T where
    T: SyncStateProvider
        + NodeVersionProvider
        + SpecProvider
        + GenesisProvider
        + FinalityProvider
        + SignedBeaconBlockProvider
        + BeaconBlockRootProvider
        + BeaconStateProvider
        + BeaconStateRootProvider
        + BlobSidecarsProvider
        + ProposerDutiesProvider
        + ForkChoiceProvider
        + BeaconCommitteesProvider
        + AttestationDataProvider
        + ValidatorsProvider
        + BeaconBlockHeadersProvider
        + EventsProvider
        + NodeApiProvider
{
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SyncOnly;

    #[async_trait]
    impl SyncStateProvider for SyncOnly {
        async fn sync_state(&self) -> Result<SyncState, ApiError> {
            Ok(SyncState::default())
        }
    }

    impl NodeVersionProvider for SyncOnly {}
    impl SpecProvider for SyncOnly {}

    #[tokio::test]
    async fn unimplemented_capabilities_fail_unsupported() {
        let client = SyncOnly;

        assert!(client.sync_state().await.is_ok());
        assert!(matches!(
            client.node_version().await,
            Err(ApiError::Unsupported("node version"))
        ));
        assert!(matches!(
            client.raw_spec().await,
            Err(ApiError::Unsupported("spec"))
        ));
    }
}
