//! A scripted in-process upstream.

use std::{
    collections::{HashSet, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use vigil_api::{
    providers::{
        AttestationDataProvider, BeaconBlockHeadersProvider, BeaconBlockRootProvider,
        BeaconCommitteesProvider, BeaconStateProvider, BeaconStateRootProvider,
        BlobSidecarsProvider, EventStream, EventsProvider, FinalityProvider, ForkChoiceProvider,
        GenesisProvider, NodeApiProvider, NodeVersionProvider, ProposerDutiesProvider, RawSpec,
        SignedBeaconBlockProvider, SpecProvider, SyncStateProvider, ValidatorsProvider,
    },
    ApiError,
};
use vigil_primitives::{
    Finality, ForkName, Genesis, Peers, RawEvent, SyncState, VersionedSignedBeaconBlock,
};

/// A scripted upstream. Capabilities without explicit scripting keep their
/// `Unsupported` defaults.
pub struct MockUpstream {
    pub sync_state: Mutex<SyncState>,
    pub genesis_time: u64,
    pub finality_responses: Mutex<VecDeque<Finality>>,
    /// Slots that have no block; everything else gets a synthetic one.
    pub empty_slots: Mutex<HashSet<u64>>,
    /// Events to serve per subscription, after which the stream idles.
    pub events: Mutex<Vec<RawEvent>>,
    pub subscribe_calls: AtomicUsize,
}

impl MockUpstream {
    pub fn new() -> Arc<MockUpstream> {
        MockUpstream::with_genesis_time(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock before unix epoch")
                .as_secs()
                - 600,
        )
    }

    pub fn with_genesis_time(genesis_time: u64) -> Arc<MockUpstream> {
        Arc::new(MockUpstream {
            sync_state: Mutex::new(SyncState::default()),
            genesis_time,
            finality_responses: Mutex::new(VecDeque::new()),
            empty_slots: Mutex::new(HashSet::new()),
            events: Mutex::new(Vec::new()),
            subscribe_calls: AtomicUsize::new(0),
        })
    }

    pub fn push_finality(&self, finality: Finality) {
        self.finality_responses.lock().unwrap().push_back(finality);
    }

    pub fn mark_slot_empty(&self, slot: u64) {
        self.empty_slots.lock().unwrap().insert(slot);
    }

    pub fn push_event(&self, event: RawEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }
}

fn sample_block(slot: u64) -> VersionedSignedBeaconBlock {
    VersionedSignedBeaconBlock {
        version: ForkName::Deneb,
        execution_optimistic: Some(false),
        finalized: Some(false),
        data: serde_json::from_value(json!({
            "message": {
                "slot": slot.to_string(),
                "proposer_index": "1",
                "parent_root": format!("0x{}", "11".repeat(32)),
                "state_root": format!("0x{}", "22".repeat(32)),
                "body": {}
            },
            "signature": format!("0x{}", "33".repeat(96)),
        }))
        .expect("valid sample block"),
    }
}

#[async_trait]
impl SyncStateProvider for MockUpstream {
    async fn sync_state(&self) -> Result<SyncState, ApiError> {
        Ok(*self.sync_state.lock().unwrap())
    }
}

#[async_trait]
impl NodeVersionProvider for MockUpstream {
    async fn node_version(&self) -> Result<String, ApiError> {
        Ok("teku/v24.1.0".to_owned())
    }
}

#[async_trait]
impl SpecProvider for MockUpstream {
    async fn raw_spec(&self) -> Result<RawSpec, ApiError> {
        let value = json!({
            "CONFIG_NAME": "testnet",
            "DEPOSIT_NETWORK_ID": "1",
            "SLOTS_PER_EPOCH": "4",
            "SECONDS_PER_SLOT": "1",
            "ALTAIR_FORK_EPOCH": "0",
            "GENESIS_FORK_VERSION": "0x00000001"
        });

        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => unreachable!(),
        }
    }
}

#[async_trait]
impl GenesisProvider for MockUpstream {
    async fn genesis(&self) -> Result<Genesis, ApiError> {
        Ok(Genesis {
            genesis_time: self.genesis_time,
            ..Genesis::default()
        })
    }
}

#[async_trait]
impl FinalityProvider for MockUpstream {
    async fn finality(&self, _state_id: &str) -> Result<Finality, ApiError> {
        let mut responses = self.finality_responses.lock().unwrap();

        match responses.len() {
            0 => Err(ApiError::NotFound),
            // Keep serving the last scripted response.
            1 => Ok(*responses.front().expect("non-empty")),
            _ => Ok(responses.pop_front().expect("non-empty")),
        }
    }
}

#[async_trait]
impl SignedBeaconBlockProvider for MockUpstream {
    async fn signed_beacon_block(
        &self,
        block_id: &str,
    ) -> Result<Option<VersionedSignedBeaconBlock>, ApiError> {
        let slot: u64 = block_id
            .parse()
            .map_err(|_| ApiError::InvalidPayload(format!("bad block id {block_id}")))?;

        if self.empty_slots.lock().unwrap().contains(&slot) {
            return Ok(None);
        }

        Ok(Some(sample_block(slot)))
    }
}

#[async_trait]
impl EventsProvider for MockUpstream {
    async fn subscribe(&self, _topic: &str) -> Result<EventStream, ApiError> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);

        let scripted: Vec<Result<RawEvent, ApiError>> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(Ok)
            .collect();

        Ok(futures::stream::iter(scripted)
            .chain(futures::stream::pending())
            .boxed())
    }
}

#[async_trait]
impl NodeApiProvider for MockUpstream {
    async fn node_peers(&self) -> Result<Peers, ApiError> {
        Ok(Peers::default())
    }
}

impl BeaconBlockRootProvider for MockUpstream {}
impl BeaconStateProvider for MockUpstream {}
impl BeaconStateRootProvider for MockUpstream {}
impl BlobSidecarsProvider for MockUpstream {}
impl ProposerDutiesProvider for MockUpstream {}
impl ForkChoiceProvider for MockUpstream {}
impl BeaconCommitteesProvider for MockUpstream {}
impl AttestationDataProvider for MockUpstream {}
impl ValidatorsProvider for MockUpstream {}
impl BeaconBlockHeadersProvider for MockUpstream {}
