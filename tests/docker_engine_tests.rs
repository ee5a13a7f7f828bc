// Optional tests against a real Docker daemon; skipped when none is reachable

use dockersnap::config::EngineConfig;
use dockersnap::create_snapshot;
use dockersnap::engine::{DockerConnector, EngineApi, EngineConnector};

fn connector() -> DockerConnector {
    DockerConnector::new(EngineConfig::default().request_timeout())
}

#[tokio::test]
async fn docker_engine_connect_and_ping() {
    let engine = match connector().connect().await {
        Ok(e) => e,
        Err(_) => return, // Skip when Docker is not available (e.g. CI without Docker)
    };
    if engine.ping().await.is_err() {
        return;
    }
    let containers = engine.list_containers().await.unwrap();
    let _ = containers;
}

#[tokio::test]
async fn docker_engine_full_snapshot() {
    let snapshot = match create_snapshot(&connector(), EngineConfig::default().deadline()).await {
        Ok(s) => s,
        Err(_) => return,
    };
    assert!(snapshot.time > 0);
    assert!(
        snapshot.running_container_count + snapshot.stopped_container_count
            <= snapshot.container_count()
    );
}
