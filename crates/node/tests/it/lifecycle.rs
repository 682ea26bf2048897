//! Lifecycle tests: bootstrap, empty slot detection, first-time-healthy.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::time::timeout;
use vigil_node::{Config, Node, Options};
use vigil_primitives::Slot;

use crate::mock::MockUpstream;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_secs()
}

#[tokio::test]
async fn start_bootstraps_and_builds_the_wallclock() {
    let mock = MockUpstream::new();
    let node = Node::with_client(
        Config::new("test", "http://localhost:5052"),
        Options::default().disable_prometheus_metrics(),
        mock,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_ready(move |_event| {
        let tx = tx.clone();
        async move {
            tx.send(()).ok();
            Ok(())
        }
    });

    node.start().await.unwrap();

    assert!(node.ready());
    assert!(node.spec().is_ok());
    assert!(node.genesis().is_ok());
    assert!(node.sync_state().is_ok());
    assert!(node.wallclock().is_ok());

    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("ready event within deadline")
        .expect("ready event delivered");

    node.stop().unwrap();
}

#[tokio::test]
async fn detects_empty_slots() {
    // Park the clock inside slot 41 so the next transition is slot 42, and
    // leave slot 41 without a block.
    let mock = MockUpstream::with_genesis_time(unix_now() - 41);
    mock.mark_slot_empty(41);

    let node = Node::with_client(
        Config::new("test", "http://localhost:5052"),
        Options::default()
            .disable_prometheus_metrics()
            .enable_empty_slot_detection(),
        mock,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_empty_slot(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.slot).ok();
            Ok(())
        }
    });

    node.start().await.unwrap();

    let slot = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("empty slot event within deadline")
        .expect("empty slot event delivered");

    assert_eq!(slot, Slot::new(42));

    node.stop().unwrap();
}

#[tokio::test]
async fn no_empty_slot_probe_while_syncing() {
    let mock = MockUpstream::with_genesis_time(unix_now() - 41);
    mock.mark_slot_empty(41);
    mock.sync_state.lock().unwrap().is_syncing = true;

    let node = Node::with_client(
        Config::new("test", "http://localhost:5052"),
        Options::default()
            .disable_prometheus_metrics()
            .enable_empty_slot_detection(),
        mock,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_empty_slot(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.slot).ok();
            Ok(())
        }
    });

    node.start().await.unwrap();

    // Two slot transitions pass without a probe firing.
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(rx.try_recv().is_err());

    node.stop().unwrap();
}

#[tokio::test]
async fn first_time_healthy_fires_once_on_first_successful_check() {
    let mock = MockUpstream::new();
    let node = Node::with_client(
        Config::new("test", "http://localhost:5052"),
        Options::default().disable_prometheus_metrics(),
        mock,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_first_time_healthy(move |_event| {
        let tx = tx.clone();
        async move {
            tx.send(()).ok();
            Ok(())
        }
    });

    node.start().await.unwrap();

    timeout(Duration::from_secs(3), rx.recv())
        .await
        .expect("first-time-healthy within deadline")
        .expect("first-time-healthy delivered");

    // The latch holds: no duplicate even though checks keep succeeding.
    assert!(rx.try_recv().is_err());

    node.stop().unwrap();
}
