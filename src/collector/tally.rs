// Counting helpers for the collection steps. Exposed for unit tests.

use bollard::models::{ContainerSummary, Node};
use std::collections::{HashMap, HashSet};

/// Service label naming the Swarm stack a service belongs to.
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";
/// Container label naming the Compose project a container belongs to.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

const NANO_CPUS_PER_CPU: i64 = 1_000_000_000;

/// Counters derived from the full container list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerTally {
    pub running: usize,
    pub stopped: usize,
    pub healthy: usize,
    pub unhealthy: usize,
    /// Distinct Compose project labels.
    pub compose_projects: usize,
}

impl ContainerTally {
    /// State buckets match exactly ("running" / "exited"); health matches on the
    /// status text ("Up 3 hours (healthy)") and is independent of state.
    pub fn from_containers(containers: &[ContainerSummary]) -> Self {
        let mut tally = Self::default();
        for c in containers {
            match state(c) {
                "exited" => tally.stopped += 1,
                "running" => tally.running += 1,
                _ => {}
            }

            let status = c.status.as_deref().unwrap_or_default();
            if status.contains("(healthy)") {
                tally.healthy += 1;
            } else if status.contains("(unhealthy)") {
                tally.unhealthy += 1;
            }
        }
        tally.compose_projects = distinct_label_values(
            containers.iter().map(|c| c.labels.as_ref()),
            COMPOSE_PROJECT_LABEL,
        );
        tally
    }
}

/// Lifecycle state as reported by the engine ("running", "exited", ...); empty if absent.
fn state(container: &ContainerSummary) -> &str {
    container
        .state
        .as_ref()
        .map(AsRef::<str>::as_ref)
        .unwrap_or_default()
}

/// Number of distinct values of `key` across a set of label maps.
pub(crate) fn distinct_label_values<'a>(
    labels: impl IntoIterator<Item = Option<&'a HashMap<String, String>>>,
    key: &str,
) -> usize {
    labels
        .into_iter()
        .flatten()
        .filter_map(|l| l.get(key))
        .collect::<HashSet<_>>()
        .len()
}

/// Cluster-wide (cpu count, memory bytes). CPU count truncates the NanoCPUs sum.
pub(crate) fn node_totals(nodes: &[Node]) -> (i64, i64) {
    let (nano_cpus, memory) = nodes
        .iter()
        .filter_map(|n| n.description.as_ref().and_then(|d| d.resources.as_ref()))
        .fold((0i64, 0i64), |(cpu, mem), r| {
            (
                cpu + r.nano_cpus.unwrap_or(0),
                mem + r.memory_bytes.unwrap_or(0),
            )
        });
    (nano_cpus / NANO_CPUS_PER_CPU, memory)
}
