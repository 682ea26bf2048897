//! The metrics collector subsystem.
//!
//! A set of jobs that subscribe to node events and drive the `metrics`
//! facade. The exporter/registry is the embedder's concern; this module
//! only records. Instruments carry the node name as a label so several
//! nodes can share one registry.

mod events;
mod forks;
mod general;
mod health;
mod sync;

use tokio_util::sync::CancellationToken;

use crate::node::Node;

/// Per-job instrument context: the namespace prefix and shared labels.
#[derive(Clone)]
pub(crate) struct Instruments {
    namespace: String,
    node: String,
    module: &'static str,
}

impl Instruments {
    fn new(node: &Node, module: &'static str) -> Instruments {
        Instruments {
            namespace: node.options().metrics_namespace.clone(),
            node: node.config().name.clone(),
            module,
        }
    }

    fn name(&self, suffix: &str) -> String {
        format!("{}_{}_{}", self.namespace, self.module, suffix)
    }

    fn node_label(&self) -> String {
        self.node.clone()
    }
}

/// Register every metrics job against the node.
pub(crate) fn start(node: &Node, token: &CancellationToken) {
    health::start(node, Instruments::new(node, "health"));
    sync::start(node, Instruments::new(node, "sync"));
    events::start(node, Instruments::new(node, "event"), token);
    forks::start(node, Instruments::new(node, "fork"));
    general::start(node, Instruments::new(node, "general"));
}
