//! Altair light client protocol types.

mod bootstrap;
mod header;
mod sync_committee;
mod update;

pub use bootstrap::Bootstrap;
pub use header::LightClientHeader;
pub use sync_committee::{SyncAggregate, SyncCommittee};
pub use update::{FinalityUpdate, OptimisticUpdate, Update};
