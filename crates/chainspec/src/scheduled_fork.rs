//! The fork schedule view derived from fork epochs.

use serde::{Deserialize, Serialize};
use vigil_primitives::Epoch;

use crate::fork_epoch::ForkEpochs;

/// A fork schedule row: name, activation epoch and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledFork {
    pub name: String,
    pub epoch: Epoch,
    pub version: String,
}

impl ForkEpochs {
    /// The schedule as rows ordered by activation epoch, canonical order
    /// breaking ties.
    pub fn as_scheduled_forks(&self) -> Vec<ScheduledFork> {
        let mut forks: Vec<&crate::ForkEpoch> = self.iter().collect();
        forks.sort_by_key(|fork| (fork.epoch, fork.name));

        forks
            .into_iter()
            .map(|fork| ScheduledFork {
                name: fork.name.to_string(),
                epoch: fork.epoch,
                version: fork.version.clone(),
            })
            .collect()
    }
}
