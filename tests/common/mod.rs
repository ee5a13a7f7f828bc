// Shared test helpers: an in-memory engine and connector

#![allow(dead_code)]

use bollard::models::{
    ContainerSummary, ImageSummary, Node, Service, SystemInfo, SystemVersion, Volume,
    VolumeListResponse, VolumeScopeEnum,
};
use dockersnap::engine::{EngineApi, EngineConnector};
use dockersnap::error::EngineError;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn engine_error(message: &str) -> EngineError {
    EngineError::Api(bollard::errors::Error::DockerResponseServerError {
        status_code: 500,
        message: message.to_string(),
    })
}

/// Counts open connections; decremented when the engine holding it is dropped.
#[derive(Debug)]
pub struct Lease(Arc<AtomicUsize>);

impl Lease {
    fn new(open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self(open)
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Engine answering from canned payloads. `None` makes the call fail.
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    pub ping_fails: bool,
    pub ping_delay: Option<Duration>,
    pub info: Option<SystemInfo>,
    pub services: Option<Vec<Service>>,
    pub nodes: Option<Vec<Node>>,
    pub containers: Option<Vec<ContainerSummary>>,
    /// Env by container id; ids missing here fail to inspect.
    pub env: HashMap<String, Vec<String>>,
    pub images: Option<Vec<ImageSummary>>,
    pub volumes: Option<VolumeListResponse>,
    pub networks: Option<Vec<serde_json::Value>>,
    pub version: Option<SystemVersion>,
    pub lease: Option<Arc<Lease>>,
}

fn canned<T: Clone>(value: &Option<T>, what: &str) -> Result<T, EngineError> {
    value
        .clone()
        .ok_or_else(|| engine_error(&format!("{what} unavailable")))
}

impl EngineApi for FakeEngine {
    async fn ping(&self) -> Result<(), EngineError> {
        if let Some(delay) = self.ping_delay {
            tokio::time::sleep(delay).await;
        }
        if self.ping_fails {
            return Err(engine_error("connection refused"));
        }
        Ok(())
    }

    async fn info(&self) -> Result<SystemInfo, EngineError> {
        canned(&self.info, "info")
    }

    async fn list_services(&self) -> Result<Vec<Service>, EngineError> {
        canned(&self.services, "services")
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, EngineError> {
        canned(&self.nodes, "nodes")
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        canned(&self.containers, "containers")
    }

    async fn container_env(&self, id: &str) -> Result<Vec<String>, EngineError> {
        self.env
            .get(id)
            .cloned()
            .ok_or_else(|| engine_error(&format!("no such container: {id}")))
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, EngineError> {
        canned(&self.images, "images")
    }

    async fn list_volumes(&self) -> Result<VolumeListResponse, EngineError> {
        canned(&self.volumes, "volumes")
    }

    async fn list_networks(&self) -> Result<Vec<serde_json::Value>, EngineError> {
        canned(&self.networks, "networks")
    }

    async fn version(&self) -> Result<SystemVersion, EngineError> {
        canned(&self.version, "version")
    }
}

/// Hands out clones of a template engine and tracks how many are still open.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    pub template: FakeEngine,
    pub connect_fails: bool,
    pub open: Arc<AtomicUsize>,
    pub connects: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(template: FakeEngine) -> Self {
        Self {
            template,
            ..Default::default()
        }
    }

    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl EngineConnector for FakeConnector {
    type Engine = FakeEngine;

    async fn connect(&self) -> Result<FakeEngine, EngineError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.connect_fails {
            return Err(engine_error("cannot reach docker socket"));
        }
        let mut engine = self.template.clone();
        engine.lease = Some(Arc::new(Lease::new(self.open.clone())));
        Ok(engine)
    }
}

// Fixtures, shaped like real engine responses.

pub fn info(swarm: bool, ncpu: i64, mem_total: i64) -> SystemInfo {
    serde_json::from_value(json!({
        "ServerVersion": "27.3.1",
        "NCPU": ncpu,
        "MemTotal": mem_total,
        "Swarm": { "ControlAvailable": swarm },
    }))
    .unwrap()
}

pub fn container(id: &str, state: &str, status: &str, labels: &[(&str, &str)]) -> ContainerSummary {
    let labels: HashMap<&str, &str> = labels.iter().copied().collect();
    serde_json::from_value(json!({
        "Id": id,
        "Names": [format!("/{id}")],
        "Image": "nginx:latest",
        "State": state,
        "Status": status,
        "Labels": labels,
    }))
    .unwrap()
}

pub fn service(name: &str, stack: Option<&str>) -> Service {
    let labels: HashMap<&str, &str> = stack
        .map(|s| ("com.docker.stack.namespace", s))
        .into_iter()
        .collect();
    serde_json::from_value(json!({
        "ID": format!("svc-{name}"),
        "Spec": { "Name": name, "Labels": labels },
    }))
    .unwrap()
}

pub fn node(nano_cpus: i64, memory_bytes: i64) -> Node {
    serde_json::from_value(json!({
        "Description": {
            "Resources": { "NanoCPUs": nano_cpus, "MemoryBytes": memory_bytes },
        },
    }))
    .unwrap()
}

pub fn images(n: usize) -> Vec<ImageSummary> {
    (0..n)
        .map(|i| ImageSummary {
            id: format!("sha256:{i:064}"),
            ..Default::default()
        })
        .collect()
}

pub fn volumes(names: &[&str]) -> VolumeListResponse {
    VolumeListResponse {
        volumes: Some(
            names
                .iter()
                .map(|n| Volume {
                    name: n.to_string(),
                    driver: "local".into(),
                    mountpoint: format!("/var/lib/docker/volumes/{n}/_data"),
                    scope: Some(VolumeScopeEnum::LOCAL),
                    ..Default::default()
                })
                .collect(),
        ),
        ..Default::default()
    }
}

pub fn networks(names: &[&str]) -> Vec<serde_json::Value> {
    names
        .iter()
        .map(|n| json!({ "Name": n, "Driver": "bridge" }))
        .collect()
}

pub fn version() -> SystemVersion {
    serde_json::from_value(json!({ "Version": "27.3.1", "ApiVersion": "1.47" })).unwrap()
}

/// A standalone engine where every call succeeds.
pub fn healthy_engine() -> FakeEngine {
    let containers = vec![
        container("web1", "running", "Up 2 hours (healthy)", &[("com.docker.compose.project", "shop")]),
        container("web2", "running", "Up 2 hours", &[("com.docker.compose.project", "shop")]),
        container("worker", "running", "Up 1 hour", &[]),
        container("job1", "exited", "Exited (0) 3 hours ago", &[("com.docker.compose.project", "batch")]),
        container("job2", "exited", "Exited (1) 2 days ago", &[]),
    ];
    let env = containers
        .iter()
        .filter_map(|c| c.id.clone())
        .map(|id| (id.clone(), vec![format!("HOSTNAME={id}"), "PATH=/usr/bin".into()]))
        .collect();
    FakeEngine {
        info: Some(info(false, 8, 16_000_000_000)),
        containers: Some(containers),
        env,
        images: Some(images(4)),
        volumes: Some(volumes(&["data", "cache"])),
        networks: Some(networks(&["bridge", "host", "none"])),
        version: Some(version()),
        ..Default::default()
    }
}
