//! An event-driven client for Ethereum beacon nodes.
//!
//! [`Node`] wraps a beacon node's HTTP endpoint into a resilient pseudo
//! beacon node: it keeps long-lived subscriptions to the upstream's
//! server-sent events, refreshes cached state on fixed cadences, tracks
//! upstream health with hysteresis, and fans everything out to registered
//! handlers.
//!
//! ```no_run
//! use vigil_node::{Config, Node, Options};
//!
//! # async fn run() -> Result<(), vigil_node::Error> {
//! let node = Node::new(
//!     Config::new("local", "http://localhost:5052"),
//!     Options::default().enable_default_beacon_subscription(),
//! );
//!
//! node.on_block(|event| async move {
//!     println!("block at slot {}", event.slot);
//!     Ok(())
//! });
//!
//! node.start().await?;
//! # Ok(())
//! # }
//! ```

mod broker;
mod config;
mod error;
pub mod events;
mod fetch;
mod health;
mod jobs;
mod metrics;
mod node;
mod options;
mod status;
mod subscriber;
mod subscription;

pub use broker::HandlerError;
pub use config::Config;
pub use error::Error;
pub use events::{
    EmptySlotEvent, FinalityCheckpointUpdatedEvent, FirstTimeHealthyEvent, HealthCheckFailedEvent,
    HealthCheckSucceededEvent, NodeVersionUpdatedEvent, PeersUpdatedEvent, ReadyEvent,
    SpecUpdatedEvent, SyncStatusEvent,
};
pub use health::Health;
pub use node::Node;
pub use options::{BeaconSubscriptionOptions, HealthCheckOptions, Options};
pub use status::Status;
