// Snapshot of one container engine host

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Point-in-time inventory of a container engine host.
///
/// Serializes with the PascalCase field names the control plane reads
/// (`TotalCPU`, `RunningContainerCount`, `SnapshotRaw`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Capture time, Unix epoch seconds.
    pub time: i64,
    pub docker_version: String,
    pub swarm: bool,
    #[serde(rename = "TotalCPU")]
    pub total_cpu: i64,
    pub total_memory: i64,
    pub running_container_count: usize,
    pub stopped_container_count: usize,
    pub healthy_container_count: usize,
    pub unhealthy_container_count: usize,
    pub volume_count: usize,
    pub image_count: usize,
    pub service_count: usize,
    pub stack_count: usize,
    pub node_count: usize,
    pub snapshot_raw: SnapshotRaw,
}

/// Engine payloads forwarded as the engine's JSON, never re-parsed into engine models.
/// `None` / empty when the corresponding step failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotRaw {
    pub containers: Vec<ContainerSnapshot>,
    pub volumes: Option<Value>,
    pub networks: Vec<Value>,
    pub images: Vec<Value>,
    pub info: Option<Value>,
    pub version: Option<Value>,
}

/// Container summary fields plus its configured environment (empty when inspect failed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    #[serde(flatten)]
    pub container: Map<String, Value>,
    #[serde(rename = "Env", default)]
    pub env: Vec<String>,
}

impl ContainerSnapshot {
    pub fn id(&self) -> Option<&str> {
        self.container.get("Id").and_then(Value::as_str)
    }
}

impl Snapshot {
    pub fn container_count(&self) -> usize {
        self.snapshot_raw.containers.len()
    }
}
