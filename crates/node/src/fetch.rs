//! Uncached fetchers.
//!
//! Every fetcher calls the corresponding upstream capability, writes its
//! cache slot on success (never on error or cancellation) and publishes the
//! derived event its row in the contract table names.

use std::{collections::HashMap, sync::Arc};

use tracing::debug;
use vigil_api::providers::{
    AttestationDataProvider, BeaconBlockHeadersProvider, BeaconBlockRootProvider,
    BeaconCommitteesProvider, BeaconStateProvider, BeaconStateRootProvider, BlobSidecarsProvider,
    FinalityProvider, ForkChoiceProvider, GenesisProvider, NodeApiProvider, NodeVersionProvider,
    ProposerDutiesProvider, RawSpec, SignedBeaconBlockProvider, SpecProvider, SyncStateProvider,
    ValidatorsProvider,
};
use vigil_chainspec::Spec;
use vigil_primitives::{
    lightclient::{Bootstrap, FinalityUpdate, OptimisticUpdate, Update},
    AttestationData, BeaconBlockHeader, BeaconCommittee, BlobSidecar, BlsPublicKey,
    CommitteeIndex, DepositSnapshot, Epoch, Finality, ForkChoice, Genesis, Identity, Peers,
    ProposerDuty, Root, Slot, SyncState, Validator, ValidatorIndex, VersionedBeaconState,
    VersionedSignedBeaconBlock,
};

use crate::{
    events::{
        FinalityCheckpointUpdatedEvent, NodeVersionUpdatedEvent, PeersUpdatedEvent,
        SpecUpdatedEvent, SyncStatusEvent,
    },
    node::Node,
    Error,
};

impl Node {
    /// Fetch the sync status, cache it and publish `sync_status`.
    pub async fn fetch_sync_status(&self) -> Result<SyncState, Error> {
        debug!("fetching sync status");

        let client = self.upstream()?;
        let state = self.with_cancel(client.sync_state()).await?;

        self.inner.status.update_sync_state(Some(state));

        self.inner
            .broker
            .sync_status
            .emit(SyncStatusEvent { state })
            .await;

        debug!(?state, "fetched sync status");

        Ok(state)
    }

    /// Fetch the peer list, cache it and publish `peers_updated`.
    pub async fn fetch_peers(&self) -> Result<Peers, Error> {
        debug!("fetching peers");

        let client = self.upstream()?;
        let peers = self.with_cancel(client.node_peers()).await?;

        if let Ok(mut slot) = self.inner.peers.write() {
            *slot = Some(peers.clone());
        }

        self.inner
            .broker
            .peers_updated
            .emit(PeersUpdatedEvent {
                peers: peers.clone(),
            })
            .await;

        debug!(peers = peers.len(), "fetched peers");

        Ok(peers)
    }

    /// Fetch the node version, cache it and publish `node_version_updated`.
    pub async fn fetch_node_version(&self) -> Result<String, Error> {
        debug!("fetching node version");

        let client = self.upstream()?;
        let version = self.with_cancel(client.node_version()).await?;

        if let Ok(mut slot) = self.inner.node_version.write() {
            *slot = Some(version.clone());
        }

        self.inner
            .broker
            .node_version_updated
            .emit(NodeVersionUpdatedEvent {
                version: version.clone(),
            })
            .await;

        debug!(version = %version, "fetched node version");

        Ok(version)
    }

    /// Fetch the spec, cache it, seed the network id from it and publish
    /// `spec_updated`. The event fires on every call.
    pub async fn fetch_spec(&self) -> Result<Arc<Spec>, Error> {
        debug!("fetching spec");

        let client = self.upstream()?;
        let raw = self.with_cancel(client.raw_spec()).await?;

        let spec = Arc::new(Spec::from_raw(&raw));

        if let Ok(mut slot) = self.inner.spec.write() {
            *slot = Some(Arc::clone(&spec));
        }

        if spec.deposit_network_id != 0 {
            self.inner.status.update_network_id(spec.deposit_network_id);
        }

        self.inner
            .broker
            .spec_updated
            .emit(SpecUpdatedEvent {
                spec: Arc::clone(&spec),
            })
            .await;

        debug!("fetched spec");

        Ok(spec)
    }

    /// Fetch the raw, unparsed spec map.
    pub async fn fetch_raw_spec(&self) -> Result<RawSpec, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.raw_spec()).await
    }

    /// Fetch the genesis configuration and cache it.
    pub async fn fetch_genesis(&self) -> Result<Genesis, Error> {
        debug!("fetching genesis");

        let client = self.upstream()?;
        let genesis = self.with_cancel(client.genesis()).await?;

        if let Ok(mut slot) = self.inner.genesis.write() {
            *slot = Some(genesis);
        }

        Ok(genesis)
    }

    /// Fetch finality checkpoints for a state.
    ///
    /// Only the `head` state is cached. A head fetch publishes
    /// `finality_checkpoint_updated` when any checkpoint's epoch or root
    /// differs from the cached value; unchanged fetches stay silent.
    pub async fn fetch_finality(&self, state_id: &str) -> Result<Finality, Error> {
        debug!(state_id, "fetching finality");

        let client = self.upstream()?;
        let finality = self.with_cancel(client.finality(state_id)).await?;

        if state_id == "head" {
            let changed = self
                .inner
                .finality
                .read()
                .map(|cached| *cached != Some(finality))
                .unwrap_or(true);

            if let Ok(mut slot) = self.inner.finality.write() {
                *slot = Some(finality);
            }

            if changed {
                self.inner
                    .broker
                    .finality_checkpoint_updated
                    .emit(FinalityCheckpointUpdatedEvent { finality })
                    .await;
            }
        }

        debug!(state_id, "fetched finality");

        Ok(finality)
    }

    /// Fetch a block. Absent blocks (an empty slot) come back as `None`.
    pub async fn fetch_block(
        &self,
        block_id: &str,
    ) -> Result<Option<VersionedSignedBeaconBlock>, Error> {
        debug!(block_id, "fetching block");

        let client = self.upstream()?;
        self.with_cancel(client.signed_beacon_block(block_id)).await
    }

    /// Fetch a block in a caller-chosen content type, unparsed.
    pub async fn fetch_raw_block(
        &self,
        block_id: &str,
        content_type: &str,
    ) -> Result<Vec<u8>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.raw_block(block_id, content_type))
            .await
    }

    /// Fetch a block root.
    pub async fn fetch_block_root(&self, block_id: &str) -> Result<Root, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.beacon_block_root(block_id)).await
    }

    /// Fetch a beacon state envelope.
    pub async fn fetch_beacon_state(
        &self,
        state_id: &str,
    ) -> Result<VersionedBeaconState, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.beacon_state(state_id)).await
    }

    /// Fetch a beacon state in a caller-chosen content type, unparsed.
    pub async fn fetch_raw_beacon_state(
        &self,
        state_id: &str,
        content_type: &str,
    ) -> Result<Vec<u8>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.raw_debug_beacon_state(state_id, content_type))
            .await
    }

    /// Fetch a beacon state root.
    pub async fn fetch_beacon_state_root(&self, state_id: &str) -> Result<Root, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.beacon_state_root(state_id)).await
    }

    /// Fetch blob sidecars for a block.
    pub async fn fetch_beacon_block_blobs(
        &self,
        block_id: &str,
    ) -> Result<Vec<BlobSidecar>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.blob_sidecars(block_id)).await
    }

    /// Fetch proposer duties for an epoch.
    pub async fn fetch_proposer_duties(&self, epoch: Epoch) -> Result<Vec<ProposerDuty>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.proposer_duties(epoch)).await
    }

    /// Fetch the fork choice context.
    pub async fn fetch_fork_choice(&self) -> Result<ForkChoice, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.fork_choice()).await
    }

    /// Fetch committees for a state, optionally at an epoch.
    pub async fn fetch_beacon_committees(
        &self,
        state_id: &str,
        epoch: Option<Epoch>,
    ) -> Result<Vec<BeaconCommittee>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.beacon_committees(state_id, epoch))
            .await
    }

    /// Fetch attestation data for a slot and committee.
    pub async fn fetch_attestation_data(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
    ) -> Result<AttestationData, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.attestation_data(slot, committee_index))
            .await
    }

    /// Fetch validators by index and/or pubkey, keyed by index.
    pub async fn fetch_validators(
        &self,
        state_id: &str,
        indices: &[ValidatorIndex],
        pubkeys: &[BlsPublicKey],
    ) -> Result<HashMap<ValidatorIndex, Validator>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.validators(state_id, indices, pubkeys))
            .await
    }

    /// Fetch a beacon block header.
    pub async fn fetch_beacon_block_header(
        &self,
        block_id: &str,
    ) -> Result<BeaconBlockHeader, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.beacon_block_header(block_id)).await
    }

    /// Fetch the upstream node's identity.
    pub async fn fetch_node_identity(&self) -> Result<Identity, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.node_identity()).await
    }

    /// Fetch the deposit snapshot.
    pub async fn fetch_deposit_snapshot(&self) -> Result<DepositSnapshot, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.deposit_snapshot()).await
    }

    /// Fetch a light client bootstrap for a block root.
    pub async fn fetch_light_client_bootstrap(
        &self,
        block_root: &str,
    ) -> Result<Bootstrap, Error> {
        let client = self.upstream()?;
        Ok(self
            .with_cancel(client.light_client_bootstrap(block_root))
            .await?
            .data)
    }

    /// Fetch light client updates for a period range.
    pub async fn fetch_light_client_updates(
        &self,
        start_period: u64,
        count: u64,
    ) -> Result<Vec<Update>, Error> {
        let client = self.upstream()?;
        self.with_cancel(client.light_client_updates(start_period, count))
            .await
    }

    /// Fetch the latest light client finality update.
    pub async fn fetch_light_client_finality_update(&self) -> Result<FinalityUpdate, Error> {
        let client = self.upstream()?;
        Ok(self
            .with_cancel(client.light_client_finality_update())
            .await?
            .data)
    }

    /// Fetch the latest light client optimistic update.
    pub async fn fetch_light_client_optimistic_update(&self) -> Result<OptimisticUpdate, Error> {
        let client = self.upstream()?;
        Ok(self
            .with_cancel(client.light_client_optimistic_update())
            .await?
            .data)
    }
}
