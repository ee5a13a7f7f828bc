// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod history_repo;
pub mod models;
pub mod routes;
pub mod version;
pub mod worker;

pub use collector::{collect, create_snapshot};
pub use error::{EngineError, SnapshotError};
pub use models::Snapshot;
