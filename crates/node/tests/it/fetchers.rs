//! Fetcher contract tests: cache writes, change detection, event emission.

use std::sync::Arc;

use tokio::sync::mpsc;
use vigil_node::{Config, Node, Options};
use vigil_primitives::{Checkpoint, Epoch, Finality, Root};

use crate::mock::MockUpstream;

fn quiet_options() -> Options {
    Options::default().disable_prometheus_metrics()
}

fn node_over(mock: Arc<MockUpstream>) -> Node {
    Node::with_client(
        Config::new("test", "http://localhost:5052"),
        quiet_options(),
        mock,
    )
}

fn finality(finalized_epoch: u64, root_byte: u8) -> Finality {
    Finality {
        previous_justified: Checkpoint {
            epoch: Epoch::new(finalized_epoch.saturating_sub(2)),
            root: Root::repeat_byte(0x01),
        },
        justified: Checkpoint {
            epoch: Epoch::new(finalized_epoch.saturating_sub(1)),
            root: Root::repeat_byte(0x02),
        },
        finalized: Checkpoint {
            epoch: Epoch::new(finalized_epoch),
            root: Root::repeat_byte(root_byte),
        },
    }
}

#[tokio::test]
async fn finality_change_detection_emits_only_on_change() {
    let mock = MockUpstream::new();
    mock.push_finality(finality(100, 0xaa));
    mock.push_finality(finality(101, 0xbb));

    let node = node_over(mock);

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_finality_checkpoint_updated(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.finality).ok();
            Ok(())
        }
    });

    // First call populates the empty cache, which counts as a change.
    let first = node.fetch_finality("head").await.unwrap();
    assert_eq!(first.finalized.epoch, Epoch::new(100));
    assert_eq!(rx.recv().await.unwrap().finalized.epoch, Epoch::new(100));

    // Second call sees different checkpoints and emits exactly once more.
    let second = node.fetch_finality("head").await.unwrap();
    assert_eq!(second.finalized.epoch, Epoch::new(101));
    assert_eq!(rx.recv().await.unwrap().finalized.epoch, Epoch::new(101));

    // Third call sees the same data and stays silent.
    node.fetch_finality("head").await.unwrap();
    assert!(rx.try_recv().is_err());

    assert_eq!(node.finality().unwrap().finalized.epoch, Epoch::new(101));
}

#[tokio::test]
async fn unchanged_finality_emits_exactly_once() {
    let mock = MockUpstream::new();
    mock.push_finality(finality(100, 0xaa));

    let node = node_over(mock);

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_finality_checkpoint_updated(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.finality).ok();
            Ok(())
        }
    });

    node.fetch_finality("head").await.unwrap();
    node.fetch_finality("head").await.unwrap();

    assert!(rx.recv().await.is_some());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn non_head_finality_is_not_cached_and_not_published() {
    let mock = MockUpstream::new();
    mock.push_finality(finality(90, 0xcc));

    let node = node_over(mock);

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_finality_checkpoint_updated(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.finality).ok();
            Ok(())
        }
    });

    node.fetch_finality("finalized").await.unwrap();

    assert!(rx.try_recv().is_err());
    assert!(node.finality().is_err());
}

#[tokio::test]
async fn fetch_spec_publishes_every_call() {
    let mock = MockUpstream::new();
    let node = node_over(mock);

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_spec_updated(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.spec.config_name.clone()).ok();
            Ok(())
        }
    });

    node.fetch_spec().await.unwrap();
    node.fetch_spec().await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), "testnet");
    assert_eq!(rx.recv().await.unwrap(), "testnet");
    assert!(rx.try_recv().is_err());

    // The spec fetch also seeds the network id.
    assert_eq!(node.status().network_id(), 1);
}

#[tokio::test]
async fn sync_status_updates_status_and_publishes() {
    let mock = MockUpstream::new();
    {
        let mut state = mock.sync_state.lock().unwrap();
        state.is_syncing = true;
        state.head_slot = vigil_primitives::Slot::new(12);
    }

    let node = node_over(Arc::clone(&mock));

    let (tx, mut rx) = mpsc::unbounded_channel();
    node.on_sync_status(move |event| {
        let tx = tx.clone();
        async move {
            tx.send(event.state).ok();
            Ok(())
        }
    });

    assert!(!node.status().syncing());

    node.fetch_sync_status().await.unwrap();

    assert!(node.status().syncing());
    assert!(rx.recv().await.unwrap().is_syncing);
}

#[tokio::test]
async fn cached_getters_fail_before_first_fetch() {
    let mock = MockUpstream::new();
    let node = node_over(mock);

    assert!(node.spec().is_err());
    assert!(node.genesis().is_err());
    assert!(node.node_version().is_err());
    assert!(node.finality().is_err());
    assert!(node.sync_state().is_err());
    assert!(node.peers().is_err());
    assert!(node.wallclock().is_err());

    node.fetch_genesis().await.unwrap();
    assert!(node.genesis().is_ok());
}

#[tokio::test]
async fn block_fetch_translates_missing_blocks_to_none() {
    let mock = MockUpstream::new();
    mock.mark_slot_empty(41);

    let node = node_over(mock);

    assert!(node.fetch_block("41").await.unwrap().is_none());

    let block = node.fetch_block("42").await.unwrap().expect("block present");
    assert_eq!(block.slot(), vigil_primitives::Slot::new(42));
}
