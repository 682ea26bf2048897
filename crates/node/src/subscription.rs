//! The subscription ensurer: opens per-topic event streams against the
//! upstream, dispatches inbound events, and reopens streams when they end.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use futures::StreamExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vigil_api::{
    providers::{EventStream, EventsProvider},
    ApiError, UpstreamClient,
};
use vigil_primitives::{
    BlobSidecarEvent, BlockEvent, BlockGossipEvent, ChainReorgEvent, DataColumnSidecarEvent,
    FinalizedCheckpointEvent, HeadEvent, RawEvent, SignedContributionAndProof,
    SignedVoluntaryExit, SingleAttestation, VersionedAttestation,
};

use crate::{events::topics, node::Node, Error};

/// The cadence at which the ensurer re-checks whether streams must open.
const ENSURE_INTERVAL: Duration = Duration::from_secs(2);

/// Keep trying to hold per-topic subscriptions open until cancelled.
///
/// Every tick: if subscription is enabled, topics are configured and an
/// upstream client exists, open one stream per topic. While all streams run
/// no polling happens; the loop re-enters when any stream terminates.
pub(crate) async fn ensure_beacon_subscription(node: Node, token: CancellationToken) {
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(ENSURE_INTERVAL) => {}
        }

        let subscription = &node.inner.options.beacon_subscription;
        if !subscription.enabled || subscription.topics.is_empty() {
            continue;
        }

        let Ok(client) = node.upstream() else {
            continue;
        };

        // Pre-genesis there is nothing to stream; hold off until then.
        if let Ok(genesis) = node.genesis() {
            if let Ok(until_genesis) = genesis.time().duration_since(SystemTime::now()) {
                debug!(?until_genesis, "waiting for genesis before subscribing");

                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(until_genesis) => {}
                }
            }
        }

        match subscribe_topics(&node, &client, &token).await {
            Ok(mut readers) => {
                info!(topics = ?subscription.topics, "subscribed to upstream events");

                tokio::select! {
                    _ = token.cancelled() => {
                        readers.abort_all();
                        return;
                    }
                    _ = readers.join_next() => {
                        warn!("an event stream ended, resubscribing");
                        readers.abort_all();
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "failed to subscribe to upstream events");
            }
        }
    }
}

/// Open one stream per configured topic. Any open failure tears down the
/// streams already opened this round.
async fn subscribe_topics(
    node: &Node,
    client: &Arc<dyn UpstreamClient>,
    token: &CancellationToken,
) -> Result<JoinSet<()>, Error> {
    let mut readers = JoinSet::new();

    for topic in &node.inner.options.beacon_subscription.topics {
        info!(topic = %topic, "subscribing to event topic");

        let stream = node.with_cancel(client.subscribe(topic)).await?;

        readers.spawn(read_topic(
            node.clone(),
            topic.clone(),
            stream,
            token.clone(),
        ));
    }

    Ok(readers)
}

/// Drain one topic's stream, dispatching each event. Returns when the
/// stream closes, errors, or the lifecycle is cancelled.
async fn read_topic(node: Node, topic: String, mut stream: EventStream, token: CancellationToken) {
    loop {
        let item = tokio::select! {
            _ = token.cancelled() => return,
            item = stream.next() => item,
        };

        match item {
            Some(Ok(event)) => {
                node.record_event_time();

                if let Err(err) = node.handle_event(event).await {
                    error!(topic = %topic, error = %err, "failed to handle event");
                }
            }
            Some(Err(err)) => {
                warn!(topic = %topic, error = %err, "event stream error");
                return;
            }
            None => {
                debug!(topic = %topic, "event stream closed");
                return;
            }
        }
    }
}

impl Node {
    /// Dispatch one upstream event: the raw envelope is always published
    /// first, then the topic's typed event.
    pub(crate) async fn handle_event(&self, event: RawEvent) -> Result<(), Error> {
        self.inner.broker.raw_event.emit(event.clone()).await;

        let broker = &self.inner.broker;
        let RawEvent { topic, data } = event;

        match topic.as_str() {
            topics::ATTESTATION => {
                broker.attestation.emit(decode::<VersionedAttestation>(data)?).await;
            }
            topics::SINGLE_ATTESTATION => {
                broker
                    .single_attestation
                    .emit(decode::<SingleAttestation>(data)?)
                    .await;
            }
            topics::BLOCK => {
                broker.block.emit(decode::<BlockEvent>(data)?).await;
            }
            topics::BLOCK_GOSSIP => {
                broker.block_gossip.emit(decode::<BlockGossipEvent>(data)?).await;
            }
            topics::CHAIN_REORG => {
                broker.chain_reorg.emit(decode::<ChainReorgEvent>(data)?).await;
            }
            topics::FINALIZED_CHECKPOINT => {
                broker
                    .finalized_checkpoint
                    .emit(decode::<FinalizedCheckpointEvent>(data)?)
                    .await;
            }
            topics::HEAD => {
                broker.head.emit(decode::<HeadEvent>(data)?).await;
            }
            topics::VOLUNTARY_EXIT => {
                broker
                    .voluntary_exit
                    .emit(decode::<SignedVoluntaryExit>(data)?)
                    .await;
            }
            topics::CONTRIBUTION_AND_PROOF => {
                broker
                    .contribution_and_proof
                    .emit(decode::<SignedContributionAndProof>(data)?)
                    .await;
            }
            topics::BLOB_SIDECAR => {
                broker.blob_sidecar.emit(decode::<BlobSidecarEvent>(data)?).await;
            }
            topics::DATA_COLUMN_SIDECAR => {
                broker
                    .data_column_sidecar
                    .emit(decode::<DataColumnSidecarEvent>(data)?)
                    .await;
            }
            _ => return Err(ApiError::UnknownTopic(topic).into()),
        }

        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(data)
        .map_err(|err| ApiError::InvalidPayload(err.to_string()).into())
}
