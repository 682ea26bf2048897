//! Code-driven tunables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::events::topics;

/// Behavioural options for a node. Unlike [`crate::Config`], these are
/// expected to be set by the embedding program rather than end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub beacon_subscription: BeaconSubscriptionOptions,
    pub health_check: HealthCheckOptions,
    /// Whether the metrics collector subsystem is constructed and started.
    pub prometheus_metrics: bool,
    /// The prefix metric names are namespaced under.
    pub metrics_namespace: String,
    /// Whether slot transitions probe the previous slot for a missing block.
    pub detect_empty_slots: bool,
    /// Per-request timeout passed through to the upstream HTTP client.
    #[serde(with = "humantime_serde")]
    pub http_timeout: Duration,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            beacon_subscription: BeaconSubscriptionOptions::default_disabled(),
            health_check: HealthCheckOptions::default(),
            prometheus_metrics: true,
            metrics_namespace: "eth".to_owned(),
            detect_empty_slots: false,
            http_timeout: vigil_api::DEFAULT_TIMEOUT,
        }
    }
}

impl Options {
    pub fn enable_prometheus_metrics(mut self) -> Options {
        self.prometheus_metrics = true;
        self
    }

    pub fn disable_prometheus_metrics(mut self) -> Options {
        self.prometheus_metrics = false;
        self
    }

    pub fn enable_empty_slot_detection(mut self) -> Options {
        self.detect_empty_slots = true;
        self
    }

    pub fn disable_empty_slot_detection(mut self) -> Options {
        self.detect_empty_slots = false;
        self
    }

    /// Enable the subscription with the default proxied topic set.
    pub fn enable_default_beacon_subscription(mut self) -> Options {
        self.beacon_subscription = BeaconSubscriptionOptions::default_enabled();
        self
    }
}

/// Options for the upstream event subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconSubscriptionOptions {
    pub enabled: bool,
    pub topics: Vec<String>,
}

impl BeaconSubscriptionOptions {
    /// Disabled, with no topics.
    pub fn default_disabled() -> BeaconSubscriptionOptions {
        BeaconSubscriptionOptions {
            enabled: false,
            topics: Vec::new(),
        }
    }

    /// Enabled with every topic the node proxies by default.
    pub fn default_enabled() -> BeaconSubscriptionOptions {
        BeaconSubscriptionOptions {
            enabled: true,
            topics: vec![
                topics::ATTESTATION.to_owned(),
                topics::SINGLE_ATTESTATION.to_owned(),
                topics::BLOCK.to_owned(),
                topics::CHAIN_REORG.to_owned(),
                topics::FINALIZED_CHECKPOINT.to_owned(),
                topics::HEAD.to_owned(),
                topics::VOLUNTARY_EXIT.to_owned(),
                topics::CONTRIBUTION_AND_PROOF.to_owned(),
                topics::BLOB_SIDECAR.to_owned(),
            ],
        }
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|candidate| candidate == topic)
    }
}

/// Hysteresis settings for the health tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckOptions {
    /// The cadence health probes run at.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Consecutive successes required before the node counts as healthy.
    pub successful_responses: usize,
    /// Consecutive failures required before the node counts as unhealthy.
    pub failed_responses: usize,
}

impl Default for HealthCheckOptions {
    fn default() -> HealthCheckOptions {
        HealthCheckOptions {
            interval: Duration::from_secs(15),
            successful_responses: 3,
            failed_responses: 3,
        }
    }
}
