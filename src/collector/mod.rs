// Snapshot collection: one connection, a fixed sequence of independent steps.
// A failed step logs a warning and leaves its fields at zero. Only setup
// (connect + ping) and the overall deadline fail the collection.

mod tally;

pub use tally::{COMPOSE_PROJECT_LABEL, ContainerTally, STACK_NAMESPACE_LABEL};

use crate::engine::{EngineApi, EngineConnector};
use crate::error::{EngineError, SnapshotError};
use crate::models::{ContainerSnapshot, Snapshot};
use std::time::Duration;
use tracing::warn;

/// Connects and collects. The connection is dropped on every exit path.
///
/// `deadline` bounds the whole run including the connect; when it expires the
/// in-flight engine call is dropped and [`SnapshotError::DeadlineExceeded`] is returned.
pub async fn create_snapshot<C: EngineConnector>(
    connector: &C,
    deadline: Option<Duration>,
) -> Result<Snapshot, SnapshotError> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, connect_and_collect(connector))
            .await
            .map_err(|_| SnapshotError::DeadlineExceeded(limit))?,
        None => connect_and_collect(connector).await,
    }
}

async fn connect_and_collect<C: EngineConnector>(connector: &C) -> Result<Snapshot, SnapshotError> {
    let engine = connector.connect().await.map_err(SnapshotError::Connect)?;
    collect(&engine).await
}

/// Collects a snapshot over an already-open connection.
pub async fn collect<E: EngineApi>(engine: &E) -> Result<Snapshot, SnapshotError> {
    engine.ping().await.map_err(SnapshotError::Unreachable)?;

    let mut snapshot = Snapshot::default();

    if let Err(e) = snapshot_info(&mut snapshot, engine).await {
        warn!(error = %e, resource = "info", "unable to snapshot engine information");
    }

    if snapshot.swarm {
        if let Err(e) = snapshot_swarm_services(&mut snapshot, engine).await {
            warn!(error = %e, resource = "services", "unable to snapshot Swarm services");
        }
        if let Err(e) = snapshot_nodes(&mut snapshot, engine).await {
            warn!(error = %e, resource = "nodes", "unable to snapshot Swarm nodes");
        }
    }

    if let Err(e) = snapshot_containers(&mut snapshot, engine).await {
        warn!(error = %e, resource = "containers", "unable to snapshot containers");
    }
    if let Err(e) = snapshot_images(&mut snapshot, engine).await {
        warn!(error = %e, resource = "images", "unable to snapshot images");
    }
    if let Err(e) = snapshot_volumes(&mut snapshot, engine).await {
        warn!(error = %e, resource = "volumes", "unable to snapshot volumes");
    }
    if let Err(e) = snapshot_networks(&mut snapshot, engine).await {
        warn!(error = %e, resource = "networks", "unable to snapshot networks");
    }
    if let Err(e) = snapshot_version(&mut snapshot, engine).await {
        warn!(error = %e, resource = "version", "unable to snapshot engine version");
    }

    snapshot.time = chrono::Utc::now().timestamp();
    Ok(snapshot)
}

async fn snapshot_info<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let info = engine.info().await?;

    snapshot.swarm = info
        .swarm
        .as_ref()
        .and_then(|s| s.control_available)
        .unwrap_or(false);
    snapshot.docker_version = info.server_version.clone().unwrap_or_default();
    snapshot.total_cpu = info.ncpu.unwrap_or(0);
    snapshot.total_memory = info.mem_total.unwrap_or(0);
    snapshot.snapshot_raw.info = Some(serde_json::to_value(&info)?);
    Ok(())
}

async fn snapshot_swarm_services<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let services = engine.list_services().await?;

    let stacks = tally::distinct_label_values(
        services
            .iter()
            .map(|s| s.spec.as_ref().and_then(|spec| spec.labels.as_ref())),
        STACK_NAMESPACE_LABEL,
    );

    snapshot.service_count = services.len();
    snapshot.stack_count += stacks;
    Ok(())
}

async fn snapshot_nodes<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let nodes = engine.list_nodes().await?;

    let (total_cpu, total_memory) = tally::node_totals(&nodes);
    snapshot.total_cpu = total_cpu;
    snapshot.total_memory = total_memory;
    snapshot.node_count = nodes.len();
    Ok(())
}

async fn snapshot_containers<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let listed = engine.list_containers().await?;

    let mut containers = Vec::with_capacity(listed.len());
    for container in &listed {
        let id = container.id.clone().unwrap_or_default();
        let env = match engine.container_env(&id).await {
            Ok(env) => env,
            Err(e) => {
                warn!(
                    error = %e,
                    container_id = %id,
                    "failed to retrieve env for container; keeping it without env"
                );
                Vec::new()
            }
        };
        containers.push(ContainerSnapshot {
            container: serde_json::from_value(serde_json::to_value(container)?)?,
            env,
        });
    }

    let tally = ContainerTally::from_containers(&listed);
    snapshot.running_container_count = tally.running;
    snapshot.stopped_container_count = tally.stopped;
    snapshot.healthy_container_count = tally.healthy;
    snapshot.unhealthy_container_count = tally.unhealthy;
    snapshot.stack_count += tally.compose_projects;
    snapshot.snapshot_raw.containers = containers;
    Ok(())
}

async fn snapshot_images<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let images = engine.list_images().await?;

    snapshot.image_count = images.len();
    snapshot.snapshot_raw.images = images
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;
    Ok(())
}

async fn snapshot_volumes<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    let volumes = engine.list_volumes().await?;

    snapshot.volume_count = volumes.volumes.as_ref().map_or(0, Vec::len);
    snapshot.snapshot_raw.volumes = Some(serde_json::to_value(&volumes)?);
    Ok(())
}

async fn snapshot_networks<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    snapshot.snapshot_raw.networks = engine.list_networks().await?;
    Ok(())
}

async fn snapshot_version<E: EngineApi>(
    snapshot: &mut Snapshot,
    engine: &E,
) -> Result<(), EngineError> {
    snapshot.snapshot_raw.version = Some(serde_json::to_value(engine.version().await?)?);
    Ok(())
}
