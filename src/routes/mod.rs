// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::engine::EngineConnector;
use crate::history_repo::HistoryRepo;

pub(crate) struct AppState<C> {
    pub(crate) connector: C,
    pub(crate) history_repo: Arc<HistoryRepo>,
    pub(crate) config: AppConfig,
}

impl<C: Clone> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            history_repo: self.history_repo.clone(),
            config: self.config.clone(),
        }
    }
}

pub fn app<C: EngineConnector>(
    connector: C,
    history_repo: Arc<HistoryRepo>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        connector,
        history_repo,
        config,
    };
    Router::new()
        .route("/", get(http::root_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route(
            "/api/snapshots",
            get(http::list_snapshots_handler::<C>).post(http::create_snapshot_handler::<C>),
        ) // GET, POST /api/snapshots
        .route(
            "/api/snapshots/latest",
            get(http::latest_snapshot_handler::<C>),
        ) // GET /api/snapshots/latest
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
