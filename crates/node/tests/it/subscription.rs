//! Subscription ensurer tests.

use std::{sync::Arc, time::Duration};

use vigil_node::{BeaconSubscriptionOptions, Config, Node, Options};

use crate::mock::MockUpstream;

fn node_with_subscription(mock: Arc<MockUpstream>, subscription: BeaconSubscriptionOptions) -> Node {
    let mut options = Options::default().disable_prometheus_metrics();
    options.beacon_subscription = subscription;

    Node::with_client(Config::new("test", "http://localhost:5052"), options, mock)
}

#[tokio::test]
async fn no_subscription_attempted_while_disabled() {
    let mock = MockUpstream::new();

    let subscription = BeaconSubscriptionOptions {
        enabled: false,
        topics: vec!["block".to_owned(), "head".to_owned()],
    };
    let node = node_with_subscription(Arc::clone(&mock), subscription);

    node.start().await.unwrap();

    // Give the ensurer several of its 2s ticks.
    tokio::time::sleep(Duration::from_millis(4_500)).await;
    assert_eq!(mock.subscribe_count(), 0);

    node.stop().unwrap();
}

#[tokio::test]
async fn no_subscription_attempted_without_topics() {
    let mock = MockUpstream::new();

    let subscription = BeaconSubscriptionOptions {
        enabled: true,
        topics: Vec::new(),
    };
    let node = node_with_subscription(Arc::clone(&mock), subscription);

    node.start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(4_500)).await;
    assert_eq!(mock.subscribe_count(), 0);

    node.stop().unwrap();
}

#[tokio::test]
async fn opens_one_stream_per_topic() {
    let mock = MockUpstream::new();

    let subscription = BeaconSubscriptionOptions {
        enabled: true,
        topics: vec!["block".to_owned(), "head".to_owned()],
    };
    let node = node_with_subscription(Arc::clone(&mock), subscription);

    node.start().await.unwrap();

    // One ensure tick is enough; the streams stay open so no resubscribe
    // happens afterwards.
    tokio::time::sleep(Duration::from_millis(4_500)).await;
    assert_eq!(mock.subscribe_count(), 2);

    node.stop().unwrap();
}
