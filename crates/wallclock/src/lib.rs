//! A slot/epoch wall clock derived from `(genesis_time, seconds_per_slot,
//! slots_per_epoch)`.
//!
//! The clock computes the current slot and epoch from system time and runs a
//! boundary-aligned ticker that notifies registered handlers on every slot
//! and epoch transition. Each delivery runs on its own task so a slow
//! handler cannot hold back the clock.

use std::{
    future::Future,
    sync::{Arc, RwLock, Weak},
    time::{Duration, SystemTime},
};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use vigil_primitives::{Epoch, Slot};

type SlotHandler = Arc<dyn Fn(Slot) -> BoxFuture<'static, ()> + Send + Sync>;
type EpochHandler = Arc<dyn Fn(Epoch) -> BoxFuture<'static, ()> + Send + Sync>;

/// The wall clock for one beacon chain.
pub struct Wallclock {
    genesis: SystemTime,
    seconds_per_slot: Duration,
    slots_per_epoch: u64,
    slot_handlers: RwLock<Vec<SlotHandler>>,
    epoch_handlers: RwLock<Vec<EpochHandler>>,
    ticker: CancellationToken,
}

impl Wallclock {
    /// Create a clock and start its ticker.
    ///
    /// `seconds_per_slot` must be non-zero; `slots_per_epoch` of zero is
    /// treated as one.
    pub fn new(
        genesis: SystemTime,
        seconds_per_slot: Duration,
        slots_per_epoch: u64,
    ) -> Arc<Wallclock> {
        let clock = Arc::new(Wallclock {
            genesis,
            seconds_per_slot: seconds_per_slot.max(Duration::from_millis(1)),
            slots_per_epoch: slots_per_epoch.max(1),
            slot_handlers: RwLock::new(Vec::new()),
            epoch_handlers: RwLock::new(Vec::new()),
            ticker: CancellationToken::new(),
        });

        // The ticker holds a weak handle so dropping the clock ends it.
        tokio::spawn(run_ticker(Arc::downgrade(&clock), clock.ticker.clone()));

        clock
    }

    /// Stop the ticker. Registered handlers receive no further ticks.
    pub fn stop(&self) {
        self.ticker.cancel();
    }

    /// The configured genesis time.
    pub fn genesis_time(&self) -> SystemTime {
        self.genesis
    }

    /// The slot in effect right now; slot 0 before genesis.
    pub fn current_slot(&self) -> Slot {
        self.slot_at(SystemTime::now())
    }

    /// The epoch in effect right now; epoch 0 before genesis.
    pub fn current_epoch(&self) -> Epoch {
        self.current_slot().epoch(self.slots_per_epoch)
    }

    /// The slot in effect at the given time.
    pub fn slot_at(&self, time: SystemTime) -> Slot {
        match time.duration_since(self.genesis) {
            Ok(elapsed) => {
                Slot::new((elapsed.as_millis() / self.seconds_per_slot.as_millis()) as u64)
            }
            Err(_) => Slot::new(0),
        }
    }

    /// The wall time a slot starts at.
    pub fn start_of(&self, slot: Slot) -> SystemTime {
        let offset_ms = self.seconds_per_slot.as_millis() as u64 * slot.as_u64();
        self.genesis + Duration::from_millis(offset_ms)
    }

    /// Register a handler invoked on every slot transition.
    pub fn on_slot_changed<F, Fut>(&self, handler: F)
    where
        F: Fn(Slot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Ok(mut handlers) = self.slot_handlers.write() {
            handlers.push(Arc::new(move |slot| handler(slot).boxed()));
        }
    }

    /// Register a handler invoked on every epoch transition.
    pub fn on_epoch_changed<F, Fut>(&self, handler: F)
    where
        F: Fn(Epoch) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if let Ok(mut handlers) = self.epoch_handlers.write() {
            handlers.push(Arc::new(move |epoch| handler(epoch).boxed()));
        }
    }

    fn fire_slot(&self, slot: Slot) {
        let handlers = match self.slot_handlers.read() {
            Ok(handlers) => handlers.clone(),
            Err(_) => return,
        };

        for handler in handlers {
            tokio::spawn(handler(slot));
        }
    }

    fn fire_epoch(&self, epoch: Epoch) {
        let handlers = match self.epoch_handlers.read() {
            Ok(handlers) => handlers.clone(),
            Err(_) => return,
        };

        for handler in handlers {
            tokio::spawn(handler(epoch));
        }
    }
}

impl Drop for Wallclock {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}

impl std::fmt::Debug for Wallclock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallclock")
            .field("genesis", &self.genesis)
            .field("seconds_per_slot", &self.seconds_per_slot)
            .field("slots_per_epoch", &self.slots_per_epoch)
            .finish()
    }
}

async fn run_ticker(clock: Weak<Wallclock>, token: CancellationToken) {
    // Hold off until genesis; the first tick is the first slot transition.
    let genesis = match clock.upgrade() {
        Some(clock) => clock.genesis,
        None => return,
    };

    if let Ok(until_genesis) = genesis.duration_since(SystemTime::now()) {
        debug!(?until_genesis, "wallclock waiting for genesis");

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(until_genesis) => {}
        }
    }

    let mut last = match clock.upgrade() {
        Some(clock) => {
            let slot = clock.current_slot();
            (slot, slot.epoch(clock.slots_per_epoch))
        }
        None => return,
    };

    loop {
        let until_next = match clock.upgrade() {
            Some(clock) => clock
                .start_of(last.0 + 1)
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO),
            None => return,
        };

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(until_next) => {}
        }

        let Some(clock) = clock.upgrade() else {
            return;
        };

        let slot = clock.current_slot();
        if slot == last.0 {
            continue;
        }

        trace!(slot = %slot, "slot changed");
        last.0 = slot;
        clock.fire_slot(slot);

        let epoch = slot.epoch(clock.slots_per_epoch);
        if epoch != last.1 {
            trace!(epoch = %epoch, "epoch changed");
            last.1 = epoch;
            clock.fire_epoch(epoch);
        }
    }
}
