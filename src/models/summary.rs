// Headline counters of a stored snapshot (history listing)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotSummary {
    pub id: i64,
    pub time: i64,
    pub docker_version: String,
    pub swarm: bool,
    pub container_count: usize,
    pub running_container_count: usize,
    pub stopped_container_count: usize,
    pub healthy_container_count: usize,
    pub unhealthy_container_count: usize,
    pub image_count: usize,
    pub volume_count: usize,
    pub stack_count: usize,
    pub node_count: usize,
}
