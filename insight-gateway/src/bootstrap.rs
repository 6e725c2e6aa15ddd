use anyhow::Result;
use std::sync::Arc;

use crate::{
    config::{AppConfig, StorageType},
    orchestrator::{HttpHealthProbe, OrchestratorClient},
    server::{ApiServer, AppState, Gates},
    services::DashboardService,
    storage::create_datastore,
};
use insight_models::WorkflowEnvironment;
use insight_monitor::{ConnectionMonitor, RateLimitGate};

/// Build a fully-wired ApiServer from environment variables.
/// Mirrors the logic in bin/main and is useful for tests and embedding.
pub async fn build_api_server_from_env() -> Result<ApiServer> {
    let config = AppConfig::load_from_env()?;
    build_api_server(config).await
}

pub async fn build_api_server(config: AppConfig) -> Result<ApiServer> {
    // Datastore
    let storage_config = config.storage();
    let store = create_datastore(&storage_config).await?;
    let storage_label = match storage_config.storage_type {
        StorageType::Memory => "memory",
        StorageType::Rest => "rest",
    };

    // Orchestrator client and cooldown gates
    let orchestrator_config = config.orchestrator();
    let environment = WorkflowEnvironment {
        namespace: orchestrator_config.namespace.clone(),
        flow_id: orchestrator_config.flow_id.clone(),
    };
    let orchestrator =
        Arc::new(OrchestratorClient::new(orchestrator_config)?);

    let gate_config = config.gates();
    let gates = Arc::new(Gates {
        health: Arc::new(RateLimitGate::new(gate_config.health_cooldown)),
        executions: Arc::new(RateLimitGate::new(
            gate_config.executions_cooldown,
        )),
    });

    // Connection monitor, sharing the health gate with the health route
    let prober = Arc::new(HttpHealthProbe::new(orchestrator.clone()));
    let monitor = Arc::new(ConnectionMonitor::spawn(
        prober,
        gates.health.clone(),
        config.monitor(),
    ));

    // Dashboard aggregation
    let dashboard_service = Arc::new(DashboardService::new(
        store.clone(),
        Arc::new(RateLimitGate::new(gate_config.refresh_cooldown)),
    ));

    let state = AppState {
        orchestrator,
        monitor,
        dashboard_service,
        store,
        gates,
        environment,
        storage_label,
    };

    Ok(ApiServer::new(state, config.server()))
}
