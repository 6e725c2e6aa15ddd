use crate::{
    api::{create_middleware_stack, handlers},
    config::ServerConfig,
    orchestrator::OrchestratorClient,
    services::DashboardService,
};
use axum::{
    Router,
    extract::State,
    routing::{delete, get, post},
};
use insight_models::WorkflowEnvironment;
use insight_monitor::{ConnectionMonitor, RateLimitGate};
use insight_store::Datastore;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// Cooldown gates shared by every call site of a guarded operation.
pub struct Gates {
    pub health: Arc<RateLimitGate>,
    pub executions: Arc<RateLimitGate>,
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<OrchestratorClient>,
    pub monitor: Arc<ConnectionMonitor>,
    pub dashboard_service: Arc<DashboardService>,
    pub store: Datastore,
    pub gates: Arc<Gates>,
    pub environment: WorkflowEnvironment,
    pub storage_label: &'static str,
}

pub struct ApiServer {
    app: Router,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        let app = Router::new()
            // Orchestration proxy APIs
            .route(
                "/api/v1/workflow/trigger",
                post(handlers::trigger_workflow),
            )
            .route(
                "/api/v1/workflow/executions",
                get(handlers::list_workflow_executions),
            )
            .route(
                "/api/v1/workflow/executions/{id}",
                get(handlers::get_workflow_execution),
            )
            .route("/api/v1/workflow/health", get(handlers::workflow_health))
            // Connection monitor APIs
            .route("/api/v1/connection", get(handlers::connection_status))
            .route(
                "/api/v1/connection/recheck",
                post(handlers::recheck_connection),
            )
            // Dashboard APIs over the datastore
            .route("/api/v1/dashboard", get(handlers::get_dashboard))
            .route(
                "/api/v1/executions/{id}",
                get(handlers::get_execution_detail),
            )
            .route(
                "/api/v1/executions/{id}",
                delete(handlers::delete_execution),
            )
            // Health check endpoint
            .route("/health", get(health_check))
            // Add middleware
            .layer(create_middleware_stack())
            .with_state(state);

        Self { app, config }
    }

    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Insight gateway API server listening on {}", addr);
        info!("Health check available at: http://{}/health", addr);

        axum::serve(listener, self.app).await?;

        Ok(())
    }

    /// Consume and return the underlying Axum Router so callers can serve it
    /// themselves (e.g., on an ephemeral port in tests) and discover the
    /// bound address.
    pub fn into_router(self) -> Router {
        self.app
    }
}

async fn health_check(
    State(state): State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "insight-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "services": {
            "datastore": state.storage_label,
            "orchestrator": if state.orchestrator.config().has_credentials() {
                "credentials configured"
            } else {
                "no credentials"
            },
        }
    }))
}
