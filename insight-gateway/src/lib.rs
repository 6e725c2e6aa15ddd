pub mod api;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod server;
pub mod services;
pub mod storage;

// Re-export commonly used types and functions, but avoid conflicts
pub use config::*;
pub use errors::*;
pub use server::{ApiServer, AppState, Gates};
pub use storage::create_datastore;

// Re-export orchestrator components
pub use orchestrator::{HttpHealthProbe, OrchestratorClient};

// Re-export services with specific names to avoid conflicts
pub use services::DashboardService;

// Re-export API components (handlers are typically not re-exported at crate level)
pub use api::create_middleware_stack;
// Re-export bootstrap helpers
pub use bootstrap::{build_api_server, build_api_server_from_env};
