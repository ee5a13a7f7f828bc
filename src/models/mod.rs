// Domain models: the snapshot returned by a collection and its stored summary

mod snapshot;
mod summary;

pub use snapshot::{ContainerSnapshot, Snapshot, SnapshotRaw};
pub use summary::SnapshotSummary;
