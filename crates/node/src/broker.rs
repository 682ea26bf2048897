//! The in-process event broker.
//!
//! One typed [`Topic`] per event kind, aggregated in [`Broker`]. Dispatch is
//! synchronous and in registration order: `emit` resolves once every handler
//! for the topic has returned. A handler that errors or panics is logged
//! with the topic tag and does not stop dispatch to the handlers after it.

use std::{future::Future, panic::AssertUnwindSafe, sync::Arc, sync::RwLock};

use futures::{future::BoxFuture, FutureExt};
use tracing::error;
use vigil_primitives::{
    BlobSidecarEvent, BlockEvent, BlockGossipEvent, ChainReorgEvent, DataColumnSidecarEvent,
    FinalizedCheckpointEvent, HeadEvent, RawEvent, SignedContributionAndProof,
    SignedVoluntaryExit, SingleAttestation, VersionedAttestation,
};

use crate::events::{
    topics, EmptySlotEvent, FinalityCheckpointUpdatedEvent, FirstTimeHealthyEvent,
    HealthCheckFailedEvent, HealthCheckSucceededEvent, NodeVersionUpdatedEvent, PeersUpdatedEvent,
    ReadyEvent, SpecUpdatedEvent, SyncStatusEvent,
};

/// The error type subscriber handlers may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<(), HandlerError>> + Send + Sync>;

/// A single topic's handler list.
pub struct Topic<T> {
    name: &'static str,
    handlers: RwLock<Vec<Handler<T>>>,
}

impl<T: Clone + Send + 'static> Topic<T> {
    fn new(name: &'static str) -> Topic<T> {
        Topic {
            name,
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// The topic name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a handler. Handlers accumulate; registering the same
    /// closure twice invokes it twice per event.
    pub fn on<F, Fut>(&self, handler: F)
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.push(Arc::new(move |event| handler(event).boxed()));
        }
    }

    /// Deliver an event to every handler, in registration order.
    pub async fn emit(&self, event: T) {
        let handlers = match self.handlers.read() {
            Ok(handlers) => handlers.clone(),
            Err(_) => return,
        };

        for handler in handlers {
            match AssertUnwindSafe(handler(event.clone())).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(topic = self.name, error = %err, "subscriber error");
                }
                Err(_) => {
                    error!(topic = self.name, "subscriber panicked");
                }
            }
        }
    }

    /// The number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().map(|handlers| handlers.len()).unwrap_or(0)
    }
}

/// Every topic the node publishes on.
pub struct Broker {
    // Proxied upstream events.
    pub raw_event: Topic<RawEvent>,
    pub attestation: Topic<VersionedAttestation>,
    pub single_attestation: Topic<SingleAttestation>,
    pub block: Topic<BlockEvent>,
    pub block_gossip: Topic<BlockGossipEvent>,
    pub chain_reorg: Topic<ChainReorgEvent>,
    pub finalized_checkpoint: Topic<FinalizedCheckpointEvent>,
    pub head: Topic<HeadEvent>,
    pub voluntary_exit: Topic<SignedVoluntaryExit>,
    pub contribution_and_proof: Topic<SignedContributionAndProof>,
    pub blob_sidecar: Topic<BlobSidecarEvent>,
    pub data_column_sidecar: Topic<DataColumnSidecarEvent>,

    // Derived events.
    pub ready: Topic<ReadyEvent>,
    pub sync_status: Topic<SyncStatusEvent>,
    pub node_version_updated: Topic<NodeVersionUpdatedEvent>,
    pub peers_updated: Topic<PeersUpdatedEvent>,
    pub spec_updated: Topic<SpecUpdatedEvent>,
    pub slot_empty: Topic<EmptySlotEvent>,
    pub health_check_succeeded: Topic<HealthCheckSucceededEvent>,
    pub health_check_failed: Topic<HealthCheckFailedEvent>,
    pub finality_checkpoint_updated: Topic<FinalityCheckpointUpdatedEvent>,
    pub first_time_healthy: Topic<FirstTimeHealthyEvent>,
}

impl Broker {
    pub fn new() -> Broker {
        Broker {
            raw_event: Topic::new(topics::RAW_EVENT),
            attestation: Topic::new(topics::ATTESTATION),
            single_attestation: Topic::new(topics::SINGLE_ATTESTATION),
            block: Topic::new(topics::BLOCK),
            block_gossip: Topic::new(topics::BLOCK_GOSSIP),
            chain_reorg: Topic::new(topics::CHAIN_REORG),
            finalized_checkpoint: Topic::new(topics::FINALIZED_CHECKPOINT),
            head: Topic::new(topics::HEAD),
            voluntary_exit: Topic::new(topics::VOLUNTARY_EXIT),
            contribution_and_proof: Topic::new(topics::CONTRIBUTION_AND_PROOF),
            blob_sidecar: Topic::new(topics::BLOB_SIDECAR),
            data_column_sidecar: Topic::new(topics::DATA_COLUMN_SIDECAR),
            ready: Topic::new(topics::READY),
            sync_status: Topic::new(topics::SYNC_STATUS),
            node_version_updated: Topic::new(topics::NODE_VERSION_UPDATED),
            peers_updated: Topic::new(topics::PEERS_UPDATED),
            spec_updated: Topic::new(topics::SPEC_UPDATED),
            slot_empty: Topic::new(topics::EMPTY_SLOT),
            health_check_succeeded: Topic::new(topics::HEALTH_CHECK_SUCCEEDED),
            health_check_failed: Topic::new(topics::HEALTH_CHECK_FAILED),
            finality_checkpoint_updated: Topic::new(topics::FINALITY_CHECKPOINT_UPDATED),
            first_time_healthy: Topic::new(topics::FIRST_TIME_HEALTHY),
        }
    }
}

impl Default for Broker {
    fn default() -> Broker {
        Broker::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use vigil_primitives::{BlockEvent, Root, Slot};

    use super::*;

    fn block_event(slot: u64) -> BlockEvent {
        BlockEvent {
            slot: Slot::new(slot),
            block: Root::repeat_byte(0x42),
            execution_optimistic: false,
        }
    }

    #[tokio::test]
    async fn delivers_in_registration_order() {
        let broker = Broker::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let order = Arc::clone(&order);
            broker.block.on(move |_event| {
                let order = Arc::clone(&order);
                async move {
                    order.lock().unwrap().push(id);
                    Ok(())
                }
            });
        }

        broker.block.emit(block_event(1)).await;

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_fanout() {
        let broker = Broker::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        broker.block.on(move |_event| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        broker.block.on(|_event| async {
            Err::<(), HandlerError>("handler two exploded".into())
        });

        let counter = Arc::clone(&calls);
        broker.block.on(move |_event| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        broker.block.emit(block_event(2)).await;

        // Handlers one and three both ran despite handler two failing.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn panicking_handler_is_contained() {
        let broker = Broker::new();
        let calls = Arc::new(AtomicUsize::new(0));

        broker.block.on(|_event| async {
            if true {
                panic!("handler panicked");
            }
            Ok(())
        });

        let counter = Arc::clone(&calls);
        broker.block.on(move |_event| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        broker.block.emit(block_event(3)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn topics_are_independent(){
        let broker = Broker::new();
        let head_calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&head_calls);
        broker.head.on(move |_event| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        broker.block.emit(block_event(4)).await;

        assert_eq!(head_calls.load(Ordering::SeqCst), 0);
        assert_eq!(broker.head.handler_count(), 1);
        assert_eq!(broker.block.handler_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_registration_is_not_deduplicated() {
        let broker = Broker::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&calls);
            broker.block.on(move |_event| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });
        }

        broker.block.emit(block_event(5)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
