use insight_gateway::config::{AppConfig, StorageType};
use serial_test::serial;
use std::env;
use std::time::Duration;

const MANAGED_VARS: [&str; 12] = [
    "SERVER_HOST",
    "SERVER_PORT",
    "ORCHESTRATOR_URL",
    "ORCHESTRATOR_NAMESPACE",
    "ORCHESTRATOR_FLOW_ID",
    "ORCHESTRATOR_USERNAME",
    "ORCHESTRATOR_PASSWORD",
    "ORCHESTRATOR_TRIGGER_TIMEOUT",
    "HEALTH_COOLDOWN_MS",
    "EXECUTIONS_COOLDOWN_MS",
    "STORAGE_TYPE",
    "DATASTORE_URL",
];

fn clear_env() {
    for var in MANAGED_VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[tokio::test]
#[serial]
async fn test_config_loading_from_env() {
    clear_env();
    unsafe {
        env::set_var("SERVER_HOST", "127.0.0.1");
        env::set_var("SERVER_PORT", "3000");
        env::set_var("ORCHESTRATOR_URL", "http://orchestrator:9000/");
        env::set_var("ORCHESTRATOR_USERNAME", "admin");
        env::set_var("ORCHESTRATOR_PASSWORD", "secret");
    }

    let config =
        AppConfig::load_from_env().expect("Failed to load config from env");

    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.server_port, 3000);
    // Trailing slash is stripped when deriving the client config.
    assert_eq!(config.orchestrator().url, "http://orchestrator:9000");
    assert!(config.orchestrator().has_credentials());

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_default_config_values() {
    clear_env();

    let config = AppConfig::load_from_env()
        .expect("Failed to load config with defaults");

    assert_eq!(config.server_host, "0.0.0.0");
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.orchestrator_namespace, "insight.bi");
    assert_eq!(config.orchestrator_flow_id, "business_intelligence_engine");
    assert_eq!(config.monitor_max_retries, 4);
    assert_eq!(config.storage_type, "memory");

    let orchestrator = config.orchestrator();
    assert_eq!(orchestrator.trigger_timeout, Duration::from_secs(30));
    assert_eq!(orchestrator.status_timeout, Duration::from_secs(5));
    assert!(!orchestrator.has_credentials());

    let gates = config.gates();
    assert_eq!(gates.health_cooldown, Duration::from_millis(2000));
    assert_eq!(gates.executions_cooldown, Duration::from_millis(2000));
    assert_eq!(gates.refresh_cooldown, Duration::from_millis(1000));
}

#[tokio::test]
#[serial]
async fn test_partial_credentials_are_ignored() {
    clear_env();
    unsafe {
        env::set_var("ORCHESTRATOR_USERNAME", "admin");
    }

    let config = AppConfig::load_from_env().expect("Failed to load config");
    assert!(!config.orchestrator().has_credentials());
    assert!(config.orchestrator().credentials().is_none());

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_storage_config_from_env() {
    clear_env();
    unsafe {
        env::set_var("STORAGE_TYPE", "rest");
        env::set_var("DATASTORE_URL", "https://data.example.com");
    }

    let config = AppConfig::load_from_env().expect("Failed to load config");
    let storage = config.storage();
    assert_eq!(storage.storage_type, StorageType::Rest);
    assert_eq!(
        storage.datastore_url.as_deref(),
        Some("https://data.example.com")
    );

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_unknown_storage_type_falls_back_to_memory() {
    clear_env();
    unsafe {
        env::set_var("STORAGE_TYPE", "postgres");
    }

    let config = AppConfig::load_from_env().expect("Failed to load config");
    assert_eq!(config.storage().storage_type, StorageType::Memory);

    clear_env();
}
