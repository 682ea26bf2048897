//! The node façade: lifecycle, bootstrap and cached getters.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, RwLock,
    },
    time::{Duration, Instant},
};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vigil_api::{providers::SyncStateProvider, ApiError, BeaconApi, UpstreamClient};
use vigil_chainspec::Spec;
use vigil_primitives::{Finality, Genesis, Peers, Slot, SyncState};
use vigil_wallclock::Wallclock;

use crate::{
    broker::Broker,
    config::Config,
    events::{FirstTimeHealthyEvent, HealthCheckFailedEvent, HealthCheckSucceededEvent, ReadyEvent},
    jobs, metrics,
    options::Options,
    status::Status,
    subscription, Error,
};

/// The bootstrap backoff step: failures × 5 s, clamped at 5 minutes.
const BOOTSTRAP_BACKOFF_STEP: Duration = Duration::from_secs(5);
const BOOTSTRAP_BACKOFF_MAX: Duration = Duration::from_secs(300);

/// The grace period before refreshing finality after an epoch change or a
/// finalized checkpoint event, letting the upstream commit its state.
pub(crate) const FINALITY_REFRESH_GRACE: Duration = Duration::from_secs(3);

/// The settle delay before probing the previous slot for a missing block.
const EMPTY_SLOT_PROBE_DELAY: Duration = Duration::from_millis(200);

pub(crate) struct NodeInner {
    pub(crate) config: Config,
    pub(crate) options: Options,
    pub(crate) broker: Broker,
    pub(crate) status: Status,

    pub(crate) client: RwLock<Option<Arc<dyn UpstreamClient>>>,

    // Cache slots, each behind its own lock.
    pub(crate) spec: RwLock<Option<Arc<Spec>>>,
    pub(crate) genesis: RwLock<Option<Genesis>>,
    pub(crate) node_version: RwLock<Option<String>>,
    pub(crate) peers: RwLock<Option<Peers>>,
    pub(crate) finality: RwLock<Option<Finality>>,
    pub(crate) last_event_time: RwLock<Option<Instant>>,

    pub(crate) wallclock: RwLock<Option<Arc<Wallclock>>>,

    // Lifecycle: protects the store-and-reassign race between start and stop.
    lifecycle: Mutex<Option<CancellationToken>>,
    ready: AtomicBool,
    first_healthy_emitted: Mutex<bool>,
}

/// A pseudo beacon node: wraps an upstream node's HTTP API into cached
/// state, health tracking and an event stream.
///
/// Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Arc<NodeInner>,
}

impl Node {
    /// Create a node. The upstream client is built during [`Node::start`].
    pub fn new(config: Config, options: Options) -> Node {
        Node::build(config, options, None)
    }

    /// Create a node over an already-constructed upstream client. Useful
    /// for embedding and for tests with scripted upstreams.
    pub fn with_client(
        config: Config,
        options: Options,
        client: Arc<dyn UpstreamClient>,
    ) -> Node {
        Node::build(config, options, Some(client))
    }

    fn build(config: Config, options: Options, client: Option<Arc<dyn UpstreamClient>>) -> Node {
        let status = Status::new(
            options.health_check.successful_responses,
            options.health_check.failed_responses,
        );

        Node {
            inner: Arc::new(NodeInner {
                config,
                options,
                broker: Broker::new(),
                status,
                client: RwLock::new(client),
                spec: RwLock::new(None),
                genesis: RwLock::new(None),
                node_version: RwLock::new(None),
                peers: RwLock::new(None),
                finality: RwLock::new(None),
                last_event_time: RwLock::new(None),
                wallclock: RwLock::new(None),
                lifecycle: Mutex::new(None),
                ready: AtomicBool::new(false),
                first_healthy_emitted: Mutex::new(false),
            }),
        }
    }

    /// Start the node: connect upstream, bootstrap, prime caches and run
    /// the periodic jobs. Resolves once the node is running.
    pub async fn start(&self) -> Result<(), Error> {
        info!(name = %self.inner.config.name, "starting beacon node client");

        let token = CancellationToken::new();
        if let Ok(mut lifecycle) = self.inner.lifecycle.lock() {
            *lifecycle = Some(token.clone());
        }

        if self.inner.options.prometheus_metrics {
            metrics::start(self, &token);
        }

        self.ensure_client(&token).await?;
        self.bootstrap(&token).await?;

        self.fetch_sync_status().await?;

        if let Err(err) = self.fetch_finality("head").await {
            error!(error = %err, "failed to fetch initial head finality");
        }

        jobs::spawn_periodic_jobs(self, &token);

        info!(name = %self.inner.config.name, "beacon node client started");

        Ok(())
    }

    /// Start on a background task, logging the terminal error if any.
    pub fn start_async(&self) {
        let node = self.clone();

        tokio::spawn(async move {
            if let Err(err) = node.start().await {
                error!(error = %err, "failed to start beacon node client");
            }
        });
    }

    /// Stop the node: cancel every task started by [`Node::start`].
    pub fn stop(&self) -> Result<(), Error> {
        info!(name = %self.inner.config.name, "stopping beacon node client");

        if let Ok(clock) = self.inner.wallclock.read() {
            if let Some(clock) = clock.as_ref() {
                clock.stop();
            }
        }

        if let Ok(mut lifecycle) = self.inner.lifecycle.lock() {
            if let Some(token) = lifecycle.take() {
                token.cancel();
            }
        }

        Ok(())
    }

    // --- getters -------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    /// The status holder (health, sync state, network id).
    pub fn status(&self) -> &Status {
        &self.inner.status
    }

    /// Whether the node currently counts as healthy.
    pub fn healthy(&self) -> bool {
        self.inner.status.healthy()
    }

    /// Whether bootstrap has completed.
    pub fn ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// The cached spec.
    pub fn spec(&self) -> Result<Arc<Spec>, Error> {
        self.inner
            .spec
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(Error::Unavailable("spec"))
    }

    /// The cached genesis.
    pub fn genesis(&self) -> Result<Genesis, Error> {
        self.inner
            .genesis
            .read()
            .ok()
            .and_then(|slot| *slot)
            .ok_or(Error::Unavailable("genesis"))
    }

    /// The cached node version.
    pub fn node_version(&self) -> Result<String, Error> {
        self.inner
            .node_version
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(Error::Unavailable("node version"))
    }

    /// The cached peer list.
    pub fn peers(&self) -> Result<Peers, Error> {
        self.inner
            .peers
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(Error::Unavailable("peers"))
    }

    /// The cached head finality.
    pub fn finality(&self) -> Result<Finality, Error> {
        self.inner
            .finality
            .read()
            .ok()
            .and_then(|slot| *slot)
            .ok_or(Error::Unavailable("finality"))
    }

    /// The most recent sync state.
    pub fn sync_state(&self) -> Result<SyncState, Error> {
        self.inner
            .status
            .sync_state()
            .ok_or(Error::Unavailable("sync state"))
    }

    /// The wall clock, available once bootstrap completed.
    pub fn wallclock(&self) -> Result<Arc<Wallclock>, Error> {
        self.inner
            .wallclock
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(Error::Unavailable("wallclock"))
    }

    /// Time since the last inbound subscription event.
    pub fn time_since_last_event(&self) -> Option<Duration> {
        self.inner
            .last_event_time
            .read()
            .ok()
            .and_then(|slot| *slot)
            .map(|instant| instant.elapsed())
    }

    // --- internals -----------------------------------------------------

    pub(crate) fn upstream(&self) -> Result<Arc<dyn UpstreamClient>, Error> {
        self.inner
            .client
            .read()
            .ok()
            .and_then(|client| client.clone())
            .ok_or(Error::Unavailable("upstream client"))
    }

    pub(crate) fn lifecycle_token(&self) -> Option<CancellationToken> {
        self.inner.lifecycle.lock().ok().and_then(|t| t.clone())
    }

    pub(crate) fn record_event_time(&self) {
        if let Ok(mut slot) = self.inner.last_event_time.write() {
            *slot = Some(Instant::now());
        }
    }

    /// Race an upstream future against lifecycle cancellation. A cancelled
    /// call never reaches the cache writes that follow it.
    pub(crate) async fn with_cancel<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, ApiError>>,
    ) -> Result<T, Error> {
        match self.lifecycle_token() {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(Error::Cancelled),
                result = fut => Ok(result?),
            },
            None => Ok(fut.await?),
        }
    }

    /// Build the upstream client, retrying with a growing backoff until the
    /// capability probe answers or the lifecycle is cancelled.
    async fn ensure_client(&self, token: &CancellationToken) -> Result<(), Error> {
        let have_client = self
            .inner
            .client
            .read()
            .map(|client| client.is_some())
            .unwrap_or(false);
        if have_client {
            return Ok(());
        }

        let mut failures: u32 = 0;

        loop {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let attempt: Result<Arc<dyn UpstreamClient>, ApiError> = async {
                let api = BeaconApi::with_timeout(
                    &self.inner.config.addr,
                    &self.inner.config.headers,
                    self.inner.options.http_timeout,
                )?;

                // The sync-state capability doubles as the reachability probe.
                api.sync_state().await?;

                Ok(Arc::new(api) as Arc<dyn UpstreamClient>)
            }
            .await;

            match attempt {
                Ok(client) => {
                    if let Ok(mut slot) = self.inner.client.write() {
                        *slot = Some(client);
                    }

                    return Ok(());
                }
                Err(err) => {
                    failures += 1;

                    let backoff = (BOOTSTRAP_BACKOFF_STEP * failures).min(BOOTSTRAP_BACKOFF_MAX);
                    error!(
                        error = %err,
                        ?backoff,
                        "failed to reach upstream node, will retry"
                    );

                    tokio::select! {
                        _ = token.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    async fn bootstrap(&self, token: &CancellationToken) -> Result<(), Error> {
        self.initialize_state().await?;
        self.subscribe_downstream(token)?;

        let node = self.clone();
        let subscription_token = token.clone();
        tokio::spawn(async move {
            subscription::ensure_beacon_subscription(node, subscription_token).await;
        });

        self.inner.ready.store(true, Ordering::SeqCst);

        let node = self.clone();
        tokio::spawn(async move {
            node.inner.broker.ready.emit(ReadyEvent).await;
        });

        Ok(())
    }

    /// Populate spec and genesis, then build the wall clock from them.
    async fn initialize_state(&self) -> Result<(), Error> {
        let spec = self
            .fetch_spec()
            .await
            .map_err(|err| Error::Bootstrap(format!("fetching spec: {err}")))?;

        let genesis = self
            .fetch_genesis()
            .await
            .map_err(|err| Error::Bootstrap(format!("fetching genesis: {err}")))?;

        let clock = Wallclock::new(
            genesis.time(),
            spec.seconds_per_slot,
            spec.slots_per_epoch,
        );

        if let Ok(mut slot) = self.inner.wallclock.write() {
            *slot = Some(clock);
        }

        Ok(())
    }

    /// Wire the internal reactions to wall clock ticks and upstream
    /// finality events.
    fn subscribe_downstream(&self, token: &CancellationToken) -> Result<(), Error> {
        let clock = self.wallclock()?;

        let node = self.clone();
        let epoch_token = token.clone();
        clock.on_epoch_changed(move |_epoch| {
            let node = node.clone();
            let token = epoch_token.clone();
            async move {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(FINALITY_REFRESH_GRACE) => {}
                }

                if let Err(err) = node.fetch_finality("head").await {
                    debug!(error = %err, "failed to fetch finality");
                }
            }
        });

        let node = self.clone();
        let slot_token = token.clone();
        clock.on_slot_changed(move |slot| {
            let node = node.clone();
            let token = slot_token.clone();
            async move {
                if !node.inner.options.detect_empty_slots {
                    return;
                }

                if node.inner.status.syncing() {
                    return;
                }

                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(EMPTY_SLOT_PROBE_DELAY) => {}
                }

                node.probe_empty_slot(slot).await;
            }
        });

        let node = self.clone();
        let checkpoint_token = token.clone();
        self.inner.broker.finalized_checkpoint.on(move |_event| {
            let node = node.clone();
            let token = checkpoint_token.clone();
            async move {
                // Give the upstream time to commit its new head state.
                tokio::select! {
                    _ = token.cancelled() => return Ok(()),
                    _ = tokio::time::sleep(FINALITY_REFRESH_GRACE) => {}
                }

                if let Err(err) = node.fetch_finality("head").await {
                    debug!(error = %err, "failed to fetch finality for head state");
                }

                Ok(())
            }
        });

        Ok(())
    }

    /// Probe the slot before `slot`; an absent block marks `slot` empty.
    pub(crate) async fn probe_empty_slot(&self, slot: Slot) {
        if slot.as_u64() == 0 {
            return;
        }

        let previous = slot.saturating_sub(1);

        match self.fetch_block(&previous.to_string()).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(slot = %slot, "previous slot has no block");
                self.publish_empty_slot(slot).await;
            }
            Err(err) => {
                debug!(slot = %slot, error = %err, "failed to probe for empty slot");
            }
        }
    }

    async fn publish_empty_slot(&self, slot: Slot) {
        self.inner
            .broker
            .slot_empty
            .emit(crate::events::EmptySlotEvent { slot })
            .await;
    }

    /// Run one health check probe and feed the hysteresis tracker.
    pub(crate) async fn run_health_check(&self) {
        let started = Instant::now();

        let probe = async {
            let client = self.upstream()?;
            self.with_cancel(client.sync_state()).await?;
            Ok::<(), Error>(())
        }
        .await;

        match probe {
            Ok(()) => {
                self.inner.status.health().record_success();
                self.emit_first_time_healthy_once();

                self.inner
                    .broker
                    .health_check_succeeded
                    .emit(HealthCheckSucceededEvent {
                        duration: started.elapsed(),
                    })
                    .await;
            }
            // A cancelled probe is lifecycle shutdown, not an outcome.
            Err(Error::Cancelled) => {}
            Err(err) => {
                warn!(error = %err, "health check failed");

                self.inner.status.health().record_fail(&err);

                self.inner
                    .broker
                    .health_check_failed
                    .emit(HealthCheckFailedEvent {
                        duration: started.elapsed(),
                    })
                    .await;
            }
        }
    }

    /// Latch and asynchronously publish the first healthy transition.
    fn emit_first_time_healthy_once(&self) {
        let Ok(mut emitted) = self.inner.first_healthy_emitted.lock() else {
            return;
        };

        if *emitted {
            return;
        }
        *emitted = true;

        let node = self.clone();
        tokio::spawn(async move {
            node.inner
                .broker
                .first_time_healthy
                .emit(FirstTimeHealthyEvent)
                .await;
        });
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.inner.config.name)
            .field("addr", &self.inner.config.addr)
            .field("ready", &self.ready())
            .finish()
    }
}
