// Docker engine via bollard

use super::{EngineApi, EngineConnector};
use crate::error::EngineError;
use bollard::Docker;
use bollard::models::{
    ContainerSummary, ImageSummary, Node, Service, SystemInfo, SystemVersion, VolumeListResponse,
};
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, ListImagesOptions, ListNetworksOptions,
    ListNodesOptions, ListServicesOptions, ListVolumesOptions,
};
use std::time::Duration;
use tracing::debug;

/// Connects to the local engine using the ambient `DOCKER_HOST` environment.
///
/// The API version stays at the client's built-in default, so connecting never
/// touches the network; an unreachable daemon is reported by the ping.
#[derive(Debug, Clone)]
pub struct DockerConnector {
    request_timeout: Duration,
}

impl DockerConnector {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

impl EngineConnector for DockerConnector {
    type Engine = DockerEngine;

    async fn connect(&self) -> Result<DockerEngine, EngineError> {
        let docker = Docker::connect_with_defaults()?.with_timeout(self.request_timeout);
        debug!(timeout_secs = self.request_timeout.as_secs(), "connected to container engine");
        Ok(DockerEngine { docker })
    }
}

pub struct DockerEngine {
    docker: Docker,
}

impl EngineApi for DockerEngine {
    async fn ping(&self) -> Result<(), EngineError> {
        self.docker.ping().await?;
        Ok(())
    }

    async fn info(&self) -> Result<SystemInfo, EngineError> {
        Ok(self.docker.info().await?)
    }

    async fn list_services(&self) -> Result<Vec<Service>, EngineError> {
        Ok(self
            .docker
            .list_services(None::<ListServicesOptions>)
            .await?)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, EngineError> {
        Ok(self.docker.list_nodes(None::<ListNodesOptions>).await?)
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        Ok(self.docker.list_containers(Some(options)).await?)
    }

    async fn container_env(&self, id: &str) -> Result<Vec<String>, EngineError> {
        let response = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        Ok(response.config.and_then(|c| c.env).unwrap_or_default())
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, EngineError> {
        Ok(self.docker.list_images(None::<ListImagesOptions>).await?)
    }

    async fn list_volumes(&self) -> Result<VolumeListResponse, EngineError> {
        Ok(self.docker.list_volumes(None::<ListVolumesOptions>).await?)
    }

    async fn list_networks(&self) -> Result<Vec<serde_json::Value>, EngineError> {
        let networks = self
            .docker
            .list_networks(None::<ListNetworksOptions>)
            .await?;
        Ok(networks
            .into_iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?)
    }

    async fn version(&self) -> Result<SystemVersion, EngineError> {
        Ok(self.docker.version().await?)
    }
}
