//! Event dispatch tests: raw-before-typed ordering and decode resilience.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::json;
use vigil_node::{BeaconSubscriptionOptions, Config, Node, Options};
use vigil_primitives::RawEvent;

use crate::mock::MockUpstream;

fn block_event(slot: u64) -> RawEvent {
    RawEvent {
        topic: "block".to_owned(),
        data: json!({
            "slot": slot.to_string(),
            "block": format!("0x{}", "ab".repeat(32)),
            "execution_optimistic": false
        }),
    }
}

#[tokio::test]
async fn dispatches_raw_before_typed_and_survives_bad_events() {
    let mock = MockUpstream::new();

    // A valid block, an unknown topic, a block with a broken payload, then
    // another valid block.
    mock.push_event(block_event(64));
    mock.push_event(RawEvent {
        topic: "mystery".to_owned(),
        data: json!({}),
    });
    mock.push_event(RawEvent {
        topic: "block".to_owned(),
        data: json!({"slot": "not-a-number"}),
    });
    mock.push_event(block_event(65));

    let mut options = Options::default().disable_prometheus_metrics();
    options.beacon_subscription = BeaconSubscriptionOptions {
        enabled: true,
        topics: vec!["block".to_owned()],
    };

    let node = Node::with_client(
        Config::new("test", "http://localhost:5052"),
        options,
        Arc::clone(&mock) as Arc<dyn vigil_api::UpstreamClient>,
    );

    let order = Arc::new(Mutex::new(Vec::new()));

    let raw_order = Arc::clone(&order);
    node.on_event(move |event| {
        let order = Arc::clone(&raw_order);
        async move {
            order.lock().unwrap().push(format!("raw:{}", event.topic));
            Ok(())
        }
    });

    let typed_order = Arc::clone(&order);
    node.on_block(move |event| {
        let order = Arc::clone(&typed_order);
        async move {
            order.lock().unwrap().push(format!("block:{}", event.slot));
            Ok(())
        }
    });

    node.start().await.unwrap();

    // Wait for the ensurer to open the stream and drain the scripted events.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(8);
    loop {
        if order.lock().unwrap().len() >= 6 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for events, got {:?}",
            order.lock().unwrap()
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let order = order.lock().unwrap().clone();
    assert_eq!(
        order,
        vec![
            "raw:block".to_owned(),
            "block:64".to_owned(),
            // The unknown topic still surfaces as a raw event.
            "raw:mystery".to_owned(),
            // The broken payload surfaces raw, then fails typed decoding.
            "raw:block".to_owned(),
            "raw:block".to_owned(),
            "block:65".to_owned(),
        ]
    );

    node.stop().unwrap();
}
