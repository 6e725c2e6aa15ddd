use crate::{errors::ApiError, server::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use insight_models::{
    ExecutionDescriptor, ExecutionPage, HealthReport, OrchestratorHealth,
    TriggerRequest,
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub async fn trigger_workflow(
    State(state): State<AppState>,
    Json(request): Json<TriggerRequest>,
) -> Result<Json<ExecutionDescriptor>, ApiError> {
    info!("API: Triggering workflow run");

    request.validate().map_err(|_| {
        ApiError::BadRequest(
            "data_source_url is required - no default data allowed"
                .to_string(),
        )
    })?;

    if !state.orchestrator.config().has_credentials() {
        return Err(ApiError::ServiceUnavailable(
            "Orchestrator credentials not configured".to_string(),
        ));
    }

    // The UI gates triggers on connectivity; enforce it here as well so a
    // stale client cannot submit into a known-dead orchestrator.
    let snapshot = state.monitor.snapshot();
    if !snapshot.can_make_api_calls {
        return Err(ApiError::ServiceUnavailable(
            snapshot.error.unwrap_or_else(|| {
                "Orchestrator connection has not been established"
                    .to_string()
            }),
        ));
    }

    let execution = state.orchestrator.trigger_execution(&request).await?;
    Ok(Json(execution))
}

pub async fn get_workflow_execution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionDescriptor>, ApiError> {
    info!("API: Getting workflow execution: {}", id);
    let execution = state.orchestrator.get_execution(&id).await?;
    Ok(Json(execution))
}

/// Best-effort listing: rate-limited or failed lookups both come back as an
/// empty page with a message, never as an error status.
pub async fn list_workflow_executions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ExecutionPage> {
    let limit = query.limit.unwrap_or(10);

    if !state.gates.executions.try_acquire() {
        debug!("executions list rate limited, skipping request");
        return Json(ExecutionPage::empty_with_message(
            "Executions list rate limited",
        ));
    }

    Json(state.orchestrator.list_executions(limit).await)
}

pub async fn workflow_health(
    State(state): State<AppState>,
) -> Json<HealthReport> {
    let environment = state.environment.clone();

    if state.gates.health.try_acquire() {
        let orchestrator = state.orchestrator.probe_health().await;
        return Json(HealthReport {
            orchestrator,
            environment,
        });
    }

    // Cooldown not elapsed: the monitor's snapshot is the cached answer.
    debug!("health check rate limited, serving monitor snapshot");
    let snapshot = state.monitor.snapshot();
    Json(HealthReport {
        orchestrator: OrchestratorHealth {
            url: state.orchestrator.config().url.clone(),
            healthy: snapshot.is_connected,
            endpoint: None,
            data: None,
            error: snapshot.error,
            attempts: Vec::new(),
        },
        environment,
    })
}
