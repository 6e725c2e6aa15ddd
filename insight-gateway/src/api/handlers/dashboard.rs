use crate::{errors::ApiError, server::AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use insight_models::{DashboardData, ExecutionDetail};
use serde_json::json;
use tracing::{error, info};

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Json<DashboardData> {
    Json(state.dashboard_service.dashboard().await)
}

pub async fn get_execution_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionDetail>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Execution ID is required".to_string(),
        ));
    }

    let detail = state
        .dashboard_service
        .execution_detail(&id)
        .await
        .map_err(|e| {
            error!("Failed to load execution {}: {}", id, e);
            ApiError::InternalServerError(format!(
                "Failed to load execution: {}",
                e
            ))
        })?
        .ok_or_else(|| ApiError::NotFound("Execution not found".to_string()))?;

    Ok(Json(detail))
}

pub async fn delete_execution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Execution ID is required".to_string(),
        ));
    }

    info!("API: Deleting execution: {}", id);
    state.dashboard_service.delete_execution(&id).await.map_err(|e| {
        error!("Failed to delete execution {}: {}", id, e);
        ApiError::InternalServerError("Failed to delete execution".to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "message": "Execution deleted successfully"
    })))
}
