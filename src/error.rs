// Error taxonomy: degraded (per engine call) and fatal (per collection)

use std::time::Duration;

/// Failure of a single engine call. Inside a collection step this is logged and the
/// step's fields stay at their zero value.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine API error: {0}")]
    Api(#[from] bollard::errors::Error),

    /// Payload could not be re-encoded for forwarding.
    #[error("engine payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failure that aborts a whole collection and is returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unable to connect to container engine: {0}")]
    Connect(#[source] EngineError),

    #[error("container engine unreachable: {0}")]
    Unreachable(#[source] EngineError),

    #[error("snapshot collection exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
