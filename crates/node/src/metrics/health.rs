//! Health check metrics: results counter and the up gauge.

use ::metrics::{counter, gauge};

use super::Instruments;
use crate::node::Node;

pub(crate) fn start(node: &Node, instruments: Instruments) {
    let observer = Observer { instruments };

    let on_success = observer.clone();
    let succeeded_node = node.clone();
    node.on_health_check_succeeded(move |_event| {
        let observer = on_success.clone();
        let node = succeeded_node.clone();
        async move {
            observer.observe_result("success");
            observer.observe_up(node.healthy());
            Ok(())
        }
    });

    let on_failure = observer;
    let failed_node = node.clone();
    node.on_health_check_failed(move |_event| {
        let observer = on_failure.clone();
        let node = failed_node.clone();
        async move {
            observer.observe_result("fail");
            observer.observe_up(node.healthy());
            Ok(())
        }
    });
}

#[derive(Clone)]
struct Observer {
    instruments: Instruments,
}

impl Observer {
    fn observe_result(&self, result: &'static str) {
        counter!(
            self.instruments.name("check_results_total"),
            "node" => self.instruments.node_label(),
            "result" => result,
        )
        .increment(1);
    }

    fn observe_up(&self, healthy: bool) {
        gauge!(
            self.instruments.name("up"),
            "node" => self.instruments.node_label(),
        )
        .set(if healthy { 1.0 } else { 0.0 });
    }
}
