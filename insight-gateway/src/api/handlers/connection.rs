use crate::server::AppState;
use axum::{Json, extract::State};
use insight_monitor::ConnectionSnapshot;
use tracing::info;

pub async fn connection_status(
    State(state): State<AppState>,
) -> Json<ConnectionSnapshot> {
    Json(state.monitor.snapshot())
}

/// User-initiated re-check: bypasses the retry ceiling, still subject to the
/// in-flight drop rule and the health cooldown.
pub async fn recheck_connection(
    State(state): State<AppState>,
) -> Json<ConnectionSnapshot> {
    info!("API: Manual connection re-check requested");
    state.monitor.recheck().await;
    Json(state.monitor.snapshot())
}
