//! The concrete client for a real beacon node.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;
use vigil_primitives::{
    lightclient::{Bootstrap, FinalityUpdate, OptimisticUpdate, Update},
    AttestationData, BeaconBlockHeader, BeaconCommittee, BlobSidecar, BlsPublicKey,
    CommitteeIndex, DepositSnapshot, Epoch, Finality, ForkChoice, ForkName, Genesis, Identity,
    Peer, PeerCount, Peers, ProposerDuty, RawEvent, Root, SignedBeaconBlock, Slot, SyncState,
    Validator, ValidatorIndex, VersionedBeaconState, VersionedSignedBeaconBlock,
};

use crate::{
    error::ApiError,
    http::HttpClient,
    providers::{
        AttestationDataProvider, BeaconBlockHeadersProvider, BeaconBlockRootProvider,
        BeaconCommitteesProvider, BeaconStateProvider, BeaconStateRootProvider,
        BlobSidecarsProvider, EventStream, EventsProvider, FinalityProvider, ForkChoiceProvider,
        GenesisProvider, NodeApiProvider, NodeVersionProvider, ProposerDutiesProvider, RawSpec,
        SignedBeaconBlockProvider, SpecProvider, SyncStateProvider, ValidatorsProvider,
    },
    response::{ApiResponse, VersionedResponse},
    sse::{SseDecoder, SseMessage},
    DEFAULT_TIMEOUT,
};

/// A beacon node reached over HTTP.
#[derive(Debug, Clone)]
pub struct BeaconApi {
    http: HttpClient,
}

#[derive(Deserialize)]
struct VersionData {
    version: String,
}

#[derive(Deserialize)]
struct RootData {
    root: Root,
}

impl BeaconApi {
    /// Connect to the given address with the default 10-minute timeout.
    pub fn new(addr: &str, headers: &HashMap<String, String>) -> Result<BeaconApi, ApiError> {
        BeaconApi::with_timeout(addr, headers, DEFAULT_TIMEOUT)
    }

    /// Connect with an explicit per-request timeout.
    pub fn with_timeout(
        addr: &str,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<BeaconApi, ApiError> {
        Ok(BeaconApi {
            http: HttpClient::new(addr, headers, timeout)?,
        })
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn parse_fork(version: Option<&str>) -> Result<ForkName, ApiError> {
        version
            .unwrap_or("phase0")
            .parse()
            .map_err(ApiError::invalid_payload)
    }
}

#[async_trait]
impl SyncStateProvider for BeaconApi {
    async fn sync_state(&self) -> Result<SyncState, ApiError> {
        let response: ApiResponse<SyncState> = self.http.get_json("/eth/v1/node/syncing").await?;
        Ok(response.data)
    }
}

#[async_trait]
impl NodeVersionProvider for BeaconApi {
    async fn node_version(&self) -> Result<String, ApiError> {
        let response: ApiResponse<VersionData> = self.http.get_json("/eth/v1/node/version").await?;
        Ok(response.data.version)
    }
}

#[async_trait]
impl SpecProvider for BeaconApi {
    async fn raw_spec(&self) -> Result<RawSpec, ApiError> {
        let response: ApiResponse<RawSpec> = self.http.get_json("/eth/v1/config/spec").await?;
        Ok(response.data)
    }
}

#[async_trait]
impl GenesisProvider for BeaconApi {
    async fn genesis(&self) -> Result<Genesis, ApiError> {
        let response: ApiResponse<Genesis> = self.http.get_json("/eth/v1/beacon/genesis").await?;
        Ok(response.data)
    }
}

#[async_trait]
impl FinalityProvider for BeaconApi {
    async fn finality(&self, state_id: &str) -> Result<Finality, ApiError> {
        let response: ApiResponse<Finality> = self
            .http
            .get_json(&format!(
                "/eth/v1/beacon/states/{state_id}/finality_checkpoints"
            ))
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl SignedBeaconBlockProvider for BeaconApi {
    async fn signed_beacon_block(
        &self,
        block_id: &str,
    ) -> Result<Option<VersionedSignedBeaconBlock>, ApiError> {
        let response: ApiResponse<SignedBeaconBlock> = match self
            .http
            .get_json(&format!("/eth/v2/beacon/blocks/{block_id}"))
            .await
        {
            Ok(response) => response,
            // Absent blocks are a result, not an error.
            Err(ApiError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(Some(VersionedSignedBeaconBlock {
            version: BeaconApi::parse_fork(response.version.as_deref())?,
            execution_optimistic: response.execution_optimistic,
            finalized: response.finalized,
            data: response.data,
        }))
    }
}

#[async_trait]
impl BeaconBlockRootProvider for BeaconApi {
    async fn beacon_block_root(&self, block_id: &str) -> Result<Root, ApiError> {
        let response: ApiResponse<RootData> = self
            .http
            .get_json(&format!("/eth/v1/beacon/blocks/{block_id}/root"))
            .await?;
        Ok(response.data.root)
    }
}

#[async_trait]
impl BeaconStateProvider for BeaconApi {
    async fn beacon_state(&self, state_id: &str) -> Result<VersionedBeaconState, ApiError> {
        let response: ApiResponse<serde_json::Value> = self
            .http
            .get_json(&format!("/eth/v2/debug/beacon/states/{state_id}"))
            .await?;

        Ok(VersionedBeaconState {
            version: BeaconApi::parse_fork(response.version.as_deref())?,
            data: response.data,
        })
    }
}

#[async_trait]
impl BeaconStateRootProvider for BeaconApi {
    async fn beacon_state_root(&self, state_id: &str) -> Result<Root, ApiError> {
        let response: ApiResponse<RootData> = self
            .http
            .get_json(&format!("/eth/v1/beacon/states/{state_id}/root"))
            .await?;
        Ok(response.data.root)
    }
}

#[async_trait]
impl BlobSidecarsProvider for BeaconApi {
    async fn blob_sidecars(&self, block_id: &str) -> Result<Vec<BlobSidecar>, ApiError> {
        let response: ApiResponse<Vec<BlobSidecar>> = self
            .http
            .get_json(&format!("/eth/v1/beacon/blob_sidecars/{block_id}"))
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ProposerDutiesProvider for BeaconApi {
    async fn proposer_duties(&self, epoch: Epoch) -> Result<Vec<ProposerDuty>, ApiError> {
        let response: ApiResponse<Vec<ProposerDuty>> = self
            .http
            .get_json(&format!("/eth/v1/validator/duties/proposer/{epoch}"))
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ForkChoiceProvider for BeaconApi {
    async fn fork_choice(&self) -> Result<ForkChoice, ApiError> {
        // This endpoint serves the dump without the data envelope.
        self.http.get_json("/eth/v1/debug/fork_choice").await
    }
}

#[async_trait]
impl BeaconCommitteesProvider for BeaconApi {
    async fn beacon_committees(
        &self,
        state_id: &str,
        epoch: Option<Epoch>,
    ) -> Result<Vec<BeaconCommittee>, ApiError> {
        let path = match epoch {
            Some(epoch) => {
                format!("/eth/v1/beacon/states/{state_id}/committees?epoch={epoch}")
            }
            None => format!("/eth/v1/beacon/states/{state_id}/committees"),
        };

        let response: ApiResponse<Vec<BeaconCommittee>> = self.http.get_json(&path).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl AttestationDataProvider for BeaconApi {
    async fn attestation_data(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
    ) -> Result<AttestationData, ApiError> {
        let response: ApiResponse<AttestationData> = self
            .http
            .get_json(&format!(
                "/eth/v1/validator/attestation_data?slot={slot}&committee_index={committee_index}"
            ))
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ValidatorsProvider for BeaconApi {
    async fn validators(
        &self,
        state_id: &str,
        indices: &[ValidatorIndex],
        pubkeys: &[BlsPublicKey],
    ) -> Result<HashMap<ValidatorIndex, Validator>, ApiError> {
        let ids: Vec<String> = indices
            .iter()
            .map(ToString::to_string)
            .chain(pubkeys.iter().map(ToString::to_string))
            .collect();

        let path = if ids.is_empty() {
            format!("/eth/v1/beacon/states/{state_id}/validators")
        } else {
            format!(
                "/eth/v1/beacon/states/{state_id}/validators?id={}",
                ids.join(",")
            )
        };

        let response: ApiResponse<Vec<Validator>> = self.http.get_json(&path).await?;

        Ok(response
            .data
            .into_iter()
            .map(|validator| (validator.index, validator))
            .collect())
    }
}

#[async_trait]
impl BeaconBlockHeadersProvider for BeaconApi {
    async fn beacon_block_header(&self, block_id: &str) -> Result<BeaconBlockHeader, ApiError> {
        let response: ApiResponse<BeaconBlockHeader> = self
            .http
            .get_json(&format!("/eth/v1/beacon/headers/{block_id}"))
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl EventsProvider for BeaconApi {
    async fn subscribe(&self, topic: &str) -> Result<EventStream, ApiError> {
        debug!(topic, "opening event stream");

        let response = self
            .http
            .get_stream(&format!("/eth/v1/events?topics={topic}"))
            .await?;

        let mut decoder = SseDecoder::new();
        let stream = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => {
                    let events: Vec<Result<RawEvent, ApiError>> = decoder
                        .feed(&bytes)
                        .into_iter()
                        .filter_map(decode_message)
                        .collect();
                    futures::stream::iter(events)
                }
                Err(err) => futures::stream::iter(vec![Err(ApiError::from(err))]),
            })
            .flatten()
            .boxed();

        Ok(stream)
    }
}

fn decode_message(message: SseMessage) -> Option<Result<RawEvent, ApiError>> {
    let topic = message.event?;

    Some(
        serde_json::from_str(&message.data)
            .map(|data| RawEvent { topic, data })
            .map_err(ApiError::invalid_payload),
    )
}

#[async_trait]
impl NodeApiProvider for BeaconApi {
    async fn node_peers(&self) -> Result<Peers, ApiError> {
        let response: ApiResponse<Peers> = self.http.get_json("/eth/v1/node/peers").await?;
        Ok(response.data)
    }

    async fn node_peer(&self, peer_id: &str) -> Result<Peer, ApiError> {
        let response: ApiResponse<Peer> = self
            .http
            .get_json(&format!("/eth/v1/node/peers/{peer_id}"))
            .await?;
        Ok(response.data)
    }

    async fn node_peer_count(&self) -> Result<PeerCount, ApiError> {
        let response: ApiResponse<PeerCount> =
            self.http.get_json("/eth/v1/node/peer_count").await?;
        Ok(response.data)
    }

    async fn node_identity(&self) -> Result<Identity, ApiError> {
        let response: ApiResponse<Identity> = self.http.get_json("/eth/v1/node/identity").await?;
        Ok(response.data)
    }

    async fn deposit_snapshot(&self) -> Result<DepositSnapshot, ApiError> {
        let response: ApiResponse<DepositSnapshot> = self
            .http
            .get_json("/eth/v1/beacon/deposit_snapshot")
            .await?;
        Ok(response.data)
    }

    async fn raw_block(&self, block_id: &str, content_type: &str) -> Result<Vec<u8>, ApiError> {
        self.http
            .get_raw(&format!("/eth/v2/beacon/blocks/{block_id}"), content_type)
            .await
    }

    async fn raw_debug_beacon_state(
        &self,
        state_id: &str,
        content_type: &str,
    ) -> Result<Vec<u8>, ApiError> {
        self.http
            .get_raw(
                &format!("/eth/v2/debug/beacon/states/{state_id}"),
                content_type,
            )
            .await
    }

    async fn light_client_bootstrap(
        &self,
        block_root: &str,
    ) -> Result<VersionedResponse<Bootstrap>, ApiError> {
        let response: ApiResponse<Bootstrap> = self
            .http
            .get_json(&format!(
                "/eth/v1/beacon/light_client/bootstrap/{block_root}"
            ))
            .await?;
        Ok(response.into())
    }

    async fn light_client_updates(
        &self,
        start_period: u64,
        count: u64,
    ) -> Result<Vec<Update>, ApiError> {
        if count == 0 {
            return Err(ApiError::InvalidPayload(
                "count must be greater than 0".to_owned(),
            ));
        }

        let responses: Vec<ApiResponse<Update>> = self
            .http
            .get_json(&format!(
                "/eth/v1/beacon/light_client/updates?start_period={start_period}&count={count}"
            ))
            .await?;

        Ok(responses.into_iter().map(|response| response.data).collect())
    }

    async fn light_client_finality_update(
        &self,
    ) -> Result<VersionedResponse<FinalityUpdate>, ApiError> {
        let response: ApiResponse<FinalityUpdate> = self
            .http
            .get_json("/eth/v1/beacon/light_client/finality_update")
            .await?;
        Ok(response.into())
    }

    async fn light_client_optimistic_update(
        &self,
    ) -> Result<VersionedResponse<OptimisticUpdate>, ApiError> {
        let response: ApiResponse<OptimisticUpdate> = self
            .http
            .get_json("/eth/v1/beacon/light_client/optimistic_update")
            .await?;
        Ok(response.into())
    }
}
