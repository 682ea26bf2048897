//! Chain configuration as served by `/eth/v1/config/spec`, plus the derived
//! fork schedule and blob schedule views.

mod blob_schedule;
mod fork_epoch;
mod scheduled_fork;
mod spec;

pub use blob_schedule::{BlobSchedule, BlobScheduleEntry};
pub use fork_epoch::{ForkEpoch, ForkEpochs, ForkScheduleError};
pub use scheduled_fork::ScheduledFork;
pub use spec::{RawSpec, Spec};
