use anyhow::Result;
use envconfig::Envconfig;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Envconfig)]
pub struct AppConfig {
    // Server configuration
    #[envconfig(from = "SERVER_HOST", default = "0.0.0.0")]
    pub server_host: String,

    #[envconfig(from = "SERVER_PORT", default = "8080")]
    pub server_port: u16,

    // Orchestrator configuration
    #[envconfig(from = "ORCHESTRATOR_URL", default = "http://localhost:8081")]
    pub orchestrator_url: String,

    #[envconfig(from = "ORCHESTRATOR_NAMESPACE", default = "insight.bi")]
    pub orchestrator_namespace: String,

    #[envconfig(
        from = "ORCHESTRATOR_FLOW_ID",
        default = "business_intelligence_engine"
    )]
    pub orchestrator_flow_id: String,

    #[envconfig(from = "ORCHESTRATOR_USERNAME")]
    pub orchestrator_username: Option<String>,

    #[envconfig(from = "ORCHESTRATOR_PASSWORD")]
    pub orchestrator_password: Option<String>,

    #[envconfig(from = "ORCHESTRATOR_TRIGGER_TIMEOUT", default = "30")]
    pub orchestrator_trigger_timeout_seconds: u64,

    #[envconfig(from = "ORCHESTRATOR_STATUS_TIMEOUT", default = "5")]
    pub orchestrator_status_timeout_seconds: u64,

    // Cooldown gates
    #[envconfig(from = "HEALTH_COOLDOWN_MS", default = "2000")]
    pub health_cooldown_ms: u64,

    #[envconfig(from = "EXECUTIONS_COOLDOWN_MS", default = "2000")]
    pub executions_cooldown_ms: u64,

    #[envconfig(from = "REFRESH_COOLDOWN_MS", default = "1000")]
    pub refresh_cooldown_ms: u64,

    // Connection monitor
    #[envconfig(from = "MONITOR_MAX_RETRIES", default = "4")]
    pub monitor_max_retries: u32,

    // Datastore configuration
    #[envconfig(from = "STORAGE_TYPE", default = "memory")]
    pub storage_type: String,

    #[envconfig(from = "DATASTORE_URL")]
    pub datastore_url: Option<String>,

    #[envconfig(from = "DATASTORE_API_KEY")]
    pub datastore_api_key: Option<String>,

    #[envconfig(from = "DATASTORE_TIMEOUT", default = "5")]
    pub datastore_timeout_seconds: u64,

    // Observability configuration
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "LOG_FORMAT", default = "plain")]
    pub log_format: String,
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self> {
        Ok(Self::init_from_env()?)
    }

    // Helper methods to get derived configurations
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
        }
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            url: self.orchestrator_url.trim_end_matches('/').to_string(),
            namespace: self.orchestrator_namespace.clone(),
            flow_id: self.orchestrator_flow_id.clone(),
            username: self.orchestrator_username.clone(),
            password: self.orchestrator_password.clone(),
            trigger_timeout: Duration::from_secs(
                self.orchestrator_trigger_timeout_seconds,
            ),
            status_timeout: Duration::from_secs(
                self.orchestrator_status_timeout_seconds,
            ),
        }
    }

    pub fn storage(&self) -> StorageConfig {
        let storage_type = match self.storage_type.to_lowercase().as_str() {
            "rest" => StorageType::Rest,
            "memory" => StorageType::Memory,
            other => {
                warn!(
                    "Unrecognized storage type '{}', falling back to 'memory'.",
                    other
                );
                StorageType::Memory
            }
        };

        StorageConfig {
            storage_type,
            datastore_url: self.datastore_url.clone(),
            datastore_api_key: self.datastore_api_key.clone(),
            timeout: Duration::from_secs(self.datastore_timeout_seconds),
        }
    }

    pub fn gates(&self) -> GateConfig {
        GateConfig {
            health_cooldown: Duration::from_millis(self.health_cooldown_ms),
            executions_cooldown: Duration::from_millis(
                self.executions_cooldown_ms,
            ),
            refresh_cooldown: Duration::from_millis(self.refresh_cooldown_ms),
        }
    }

    pub fn monitor(&self) -> insight_monitor::MonitorConfig {
        insight_monitor::MonitorConfig {
            max_retries: self.monitor_max_retries,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub url: String,
    pub namespace: String,
    pub flow_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub trigger_timeout: Duration,
    pub status_timeout: Duration,
}

impl OrchestratorConfig {
    pub fn has_credentials(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password))
                if !username.is_empty() && !password.is_empty() =>
            {
                Some((username, password))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub storage_type: StorageType,
    pub datastore_url: Option<String>,
    pub datastore_api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageType {
    Memory,
    Rest,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub health_cooldown: Duration,
    pub executions_cooldown: Duration,
    pub refresh_cooldown: Duration,
}
