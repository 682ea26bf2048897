//! Fork activation epochs and fork-at-epoch queries.

use serde::{Deserialize, Serialize};
use vigil_primitives::{Epoch, ForkName};

/// Errors from fork schedule queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForkScheduleError {
    #[error("no fork is active at the queried epoch")]
    NoActiveFork,
    #[error("no previous fork exists at the queried epoch")]
    NoPreviousFork,
    #[error("no fork named {0}")]
    NoSuchFork(String),
}

/// A fork that activates at a specific epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkEpoch {
    pub epoch: Epoch,
    pub name: ForkName,
    /// The 4-byte fork version as a 0x hex string, empty when the spec did
    /// not carry one.
    #[serde(default)]
    pub version: String,
}

impl ForkEpoch {
    /// Whether this fork is active at the given epoch.
    pub fn active_at(&self, epoch: Epoch) -> bool {
        epoch >= self.epoch
    }
}

/// The set of forks a chain schedules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForkEpochs(pub Vec<ForkEpoch>);

impl ForkEpochs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForkEpoch> {
        self.0.iter()
    }

    /// Forks active at the given epoch, in canonical fork order.
    ///
    /// Several forks can activate on the same epoch (a non-phase0 genesis),
    /// so ties are broken by the canonical order rather than the epoch.
    pub fn active(&self, epoch: Epoch) -> Vec<&ForkEpoch> {
        let mut activated: Vec<&ForkEpoch> =
            self.iter().filter(|fork| fork.active_at(epoch)).collect();
        activated.sort_by_key(|fork| fork.name);
        activated
    }

    /// Forks not yet active at the given epoch.
    pub fn scheduled(&self, epoch: Epoch) -> Vec<&ForkEpoch> {
        self.iter().filter(|fork| !fork.active_at(epoch)).collect()
    }

    /// The fork in effect at the given epoch: the canonically-latest fork
    /// among those with the greatest activation epoch.
    pub fn current_fork(&self, epoch: Epoch) -> Result<&ForkEpoch, ForkScheduleError> {
        self.active(epoch)
            .into_iter()
            .fold(None, |largest: Option<&ForkEpoch>, fork| match largest {
                Some(prev) if fork.epoch < prev.epoch => Some(prev),
                _ => Some(fork),
            })
            .ok_or(ForkScheduleError::NoActiveFork)
    }

    /// The fork preceding the current one: the active fork of greatest epoch
    /// whose name differs from the current fork. A single-fork schedule
    /// returns that fork itself.
    pub fn previous_fork(&self, epoch: Epoch) -> Result<&ForkEpoch, ForkScheduleError> {
        if self.len() == 1 {
            return self.current_fork(epoch);
        }

        let current = self.current_fork(epoch)?;

        self.active(epoch)
            .into_iter()
            .filter(|fork| fork.name != current.name)
            .fold(None, |largest: Option<&ForkEpoch>, fork| match largest {
                Some(prev) if fork.epoch < prev.epoch => Some(prev),
                _ => Some(fork),
            })
            .ok_or(ForkScheduleError::NoPreviousFork)
    }

    /// Look up a fork by name.
    pub fn by_name(&self, name: &str) -> Result<&ForkEpoch, ForkScheduleError> {
        self.iter()
            .find(|fork| fork.name.as_str() == name)
            .ok_or_else(|| ForkScheduleError::NoSuchFork(name.to_owned()))
    }
}

impl FromIterator<ForkEpoch> for ForkEpochs {
    fn from_iter<I: IntoIterator<Item = ForkEpoch>>(iter: I) -> Self {
        ForkEpochs(iter.into_iter().collect())
    }
}
