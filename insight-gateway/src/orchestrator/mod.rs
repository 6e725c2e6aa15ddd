pub mod client;
pub mod probe;

pub use client::OrchestratorClient;
pub use probe::HttpHealthProbe;
