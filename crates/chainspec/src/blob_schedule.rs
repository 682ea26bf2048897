//! The BLOB_SCHEDULE configuration.

use serde::{Deserialize, Serialize};
use vigil_primitives::{quantities::quoted_u64, Epoch};

/// One entry of the blob schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobScheduleEntry {
    #[serde(rename = "EPOCH")]
    pub epoch: Epoch,
    #[serde(rename = "MAX_BLOBS_PER_BLOCK", with = "quoted_u64")]
    pub max_blobs_per_block: u64,
}

/// The per-epoch blob limits scheduled by the chain config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobSchedule(pub Vec<BlobScheduleEntry>);

impl BlobSchedule {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The maximum number of blobs a block may carry at the given epoch.
    ///
    /// Entries are scanned in descending epoch order and the first entry at
    /// or below the queried epoch wins. Queries before the first entry fall
    /// back to the smallest limit in the schedule; an empty schedule yields
    /// zero.
    pub fn max_blobs_per_block(&self, epoch: Epoch) -> u64 {
        if self.0.is_empty() {
            return 0;
        }

        let mut sorted = self.0.clone();
        sorted.sort_by(|a, b| b.epoch.cmp(&a.epoch));

        for entry in &sorted {
            if epoch >= entry.epoch {
                return entry.max_blobs_per_block;
            }
        }

        sorted
            .iter()
            .map(|entry| entry.max_blobs_per_block)
            .min()
            .unwrap_or(0)
    }
}
