// Container engine access: the read-only calls a snapshot needs.

mod docker;

pub use docker::{DockerConnector, DockerEngine};

use crate::error::EngineError;
use bollard::models::{
    ContainerSummary, ImageSummary, Node, Service, SystemInfo, SystemVersion, VolumeListResponse,
};
use std::future::Future;

/// One open connection to a container engine.
///
/// Every method is a single request; implementations must not retry.
pub trait EngineApi: Send + Sync {
    fn ping(&self) -> impl Future<Output = Result<(), EngineError>> + Send;

    fn info(&self) -> impl Future<Output = Result<SystemInfo, EngineError>> + Send;

    fn list_services(&self) -> impl Future<Output = Result<Vec<Service>, EngineError>> + Send;

    fn list_nodes(&self) -> impl Future<Output = Result<Vec<Node>, EngineError>> + Send;

    /// All containers, including stopped ones.
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerSummary>, EngineError>> + Send;

    /// Configured environment (`KEY=value` entries) of one container.
    fn container_env(&self, id: &str)
    -> impl Future<Output = Result<Vec<String>, EngineError>> + Send;

    fn list_images(&self) -> impl Future<Output = Result<Vec<ImageSummary>, EngineError>> + Send;

    fn list_volumes(&self) -> impl Future<Output = Result<VolumeListResponse, EngineError>> + Send;

    /// Network list, forwarded as opaque JSON.
    fn list_networks(
        &self,
    ) -> impl Future<Output = Result<Vec<serde_json::Value>, EngineError>> + Send;

    fn version(&self) -> impl Future<Output = Result<SystemVersion, EngineError>> + Send;
}

/// Opens engine connections. The returned engine is released when dropped.
pub trait EngineConnector: Clone + Send + Sync + 'static {
    type Engine: EngineApi;

    fn connect(&self) -> impl Future<Output = Result<Self::Engine, EngineError>> + Send;
}
