use http::StatusCode;
use insight_models::{
    EndpointAttempt, ExecutionDescriptor, ExecutionPage, OrchestratorHealth,
    TriggerRequest,
};
use reqwest::{Client, multipart};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::OrchestratorConfig;
use crate::errors::{OrchestratorError, transport_failure};

/// Health endpoints probed in order until one answers 2xx. The orchestrator
/// has moved its health route between releases; the list covers every
/// generation still seen in deployments.
const HEALTH_PATHS: [&str; 5] = [
    "/api/v1/main/health",
    "/api/v1/health",
    "/health",
    "/api/health",
    "/",
];

/// Authenticated HTTP client for the workflow orchestrator.
///
/// Normalizes the orchestrator's endpoint and response-shape inconsistencies
/// into the stable types in `insight-models`. No retries live here except
/// the list route's single credentialed re-attempt; transient-failure
/// recovery belongs to the connection monitor.
pub struct OrchestratorClient {
    client: Client,
    config: OrchestratorConfig,
}

impl OrchestratorClient {
    pub fn new(config: OrchestratorConfig) -> Result<Self, OrchestratorError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| OrchestratorError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Submit a run to the orchestrator as a multipart form.
    ///
    /// Single attempt: upstream 4xx/5xx map to specific user-facing messages
    /// and are not retried.
    pub async fn trigger_execution(
        &self,
        request: &TriggerRequest,
    ) -> Result<ExecutionDescriptor, OrchestratorError> {
        let (username, password) = self
            .config
            .credentials()
            .ok_or(OrchestratorError::MissingCredentials)?;

        let mut form = multipart::Form::new()
            .text("data_source_url", request.data_source_url.clone())
            .text(
                "decision_threshold",
                request.decision_threshold().to_string(),
            );
        if let Some(email) = &request.recipient_email {
            form = form.text("recipient_email", email.clone());
        }

        let url = format!(
            "{}/api/v1/executions/{}/{}",
            self.config.url, self.config.namespace, self.config.flow_id
        );
        debug!(%url, "triggering workflow execution");

        let response = self
            .client
            .post(&url)
            .basic_auth(username, Some(password))
            .header(http::header::ACCEPT, "application/json")
            .multipart(form)
            .timeout(self.config.trigger_timeout)
            .send()
            .await
            .map_err(OrchestratorError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "orchestrator rejected trigger");
            return Err(OrchestratorError::Upstream {
                status: status.as_u16(),
                message: trigger_error_message(status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| OrchestratorError::InvalidResponse(e.to_string()))
    }

    /// Fetch one execution by id. Passthrough with a short timeout.
    pub async fn get_execution(
        &self,
        id: &str,
    ) -> Result<ExecutionDescriptor, OrchestratorError> {
        let url =
            format!("{}/api/v1/main/executions/{}", self.config.url, id);

        let mut request = self
            .client
            .get(&url)
            .timeout(self.config.status_timeout);
        if let Some((username, password)) = self.config.credentials() {
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(OrchestratorError::from_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(OrchestratorError::Upstream {
                status: 404,
                message: "Execution not found".to_string(),
            });
        }
        if !status.is_success() {
            return Err(OrchestratorError::Upstream {
                status: status.as_u16(),
                message: format!("Orchestrator error: {}", status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| OrchestratorError::InvalidResponse(e.to_string()))
    }

    /// List recent runs for the configured flow, best-effort.
    ///
    /// Tries unauthenticated first and re-attempts once with credentials
    /// when the orchestrator asks for them. Any upstream unavailability
    /// degrades to an empty page with a message; callers must treat empty as
    /// a valid non-error state.
    pub async fn list_executions(&self, limit: usize) -> ExecutionPage {
        match self.search_executions(limit, false).await {
            Ok(page) => page,
            Err(OrchestratorError::Upstream {
                status: 401 | 403, ..
            }) if self.config.has_credentials() => {
                debug!("executions search unauthenticated; retrying with credentials");
                match self.search_executions(limit, true).await {
                    Ok(page) => page,
                    Err(e) => {
                        warn!(error = %e, "orchestrator executions unavailable");
                        ExecutionPage::empty_with_message(format!(
                            "Orchestrator executions unavailable: {}",
                            e
                        ))
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "orchestrator executions unavailable");
                ExecutionPage::empty_with_message(format!(
                    "Orchestrator executions unavailable: {}",
                    e
                ))
            }
        }
    }

    async fn search_executions(
        &self,
        limit: usize,
        with_auth: bool,
    ) -> Result<ExecutionPage, OrchestratorError> {
        let url =
            format!("{}/api/v1/main/executions/search", self.config.url);
        let size = limit.to_string();

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("namespace", self.config.namespace.as_str()),
                ("flowId", self.config.flow_id.as_str()),
                ("size", size.as_str()),
            ])
            .timeout(self.config.status_timeout);
        if with_auth {
            let (username, password) = self
                .config
                .credentials()
                .ok_or(OrchestratorError::MissingCredentials)?;
            request = request.basic_auth(username, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(OrchestratorError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrchestratorError::Upstream {
                status: status.as_u16(),
                message: format!("Orchestrator error: {}", status),
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OrchestratorError::InvalidResponse(e.to_string()))?;
        Ok(normalize_page(value))
    }

    /// Probe the health endpoints in fallback order until one answers 2xx.
    ///
    /// Never errors; a fully failed sweep reports `healthy: false` with the
    /// last failure and every attempted endpoint.
    pub async fn probe_health(&self) -> OrchestratorHealth {
        let mut attempts: Vec<EndpointAttempt> = Vec::new();
        let mut last_error: Option<String> = None;

        for path in HEALTH_PATHS {
            let endpoint = format!("{}{}", self.config.url, path);
            debug!(%endpoint, "probing orchestrator health endpoint");

            let mut request = self
                .client
                .get(&endpoint)
                .timeout(self.config.status_timeout);
            if let Some((username, password)) = self.config.credentials() {
                request = request.basic_auth(username, Some(password));
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let data = parse_health_body(response).await;
                        attempts.push(EndpointAttempt {
                            endpoint: endpoint.clone(),
                            status: Some(status.as_u16()),
                            error: None,
                        });
                        return OrchestratorHealth {
                            url: self.config.url.clone(),
                            healthy: true,
                            endpoint: Some(endpoint),
                            data: Some(data),
                            error: None,
                            attempts,
                        };
                    }
                    attempts.push(EndpointAttempt {
                        endpoint,
                        status: Some(status.as_u16()),
                        error: None,
                    });
                    last_error = Some(format!("HTTP {}", status.as_u16()));
                }
                Err(e) => {
                    let detail = transport_failure(&e).detail();
                    attempts.push(EndpointAttempt {
                        endpoint,
                        status: None,
                        error: Some(detail.clone()),
                    });
                    last_error = Some(detail);
                }
            }
        }

        OrchestratorHealth {
            url: self.config.url.clone(),
            healthy: false,
            endpoint: None,
            data: None,
            error: Some(last_error.unwrap_or_else(|| {
                "All health endpoints failed".to_string()
            })),
            attempts,
        }
    }
}

fn trigger_error_message(status: StatusCode) -> String {
    if status == StatusCode::UNAUTHORIZED {
        "Authentication failed. Please check orchestrator credentials."
            .to_string()
    } else if status == StatusCode::NOT_FOUND {
        "Workflow not found. Please ensure the workflow is deployed."
            .to_string()
    } else if status == StatusCode::BAD_REQUEST {
        "Invalid workflow parameters. Please check your data source URL."
            .to_string()
    } else if status.is_server_error() {
        "Orchestrator server error. Please try again later.".to_string()
    } else {
        format!("Orchestrator error: {}", status)
    }
}

/// Accept both the documented `{results, total}` shape and the bare array
/// some orchestrator versions return.
fn normalize_page(value: serde_json::Value) -> ExecutionPage {
    if let Ok(page) = serde_json::from_value::<ExecutionPage>(value.clone()) {
        return page;
    }
    if let Ok(results) =
        serde_json::from_value::<Vec<ExecutionDescriptor>>(value)
    {
        let total = results.len() as u64;
        return ExecutionPage {
            results,
            total,
            message: None,
        };
    }
    ExecutionPage::empty_with_message(
        "Unrecognized executions response shape",
    )
}

/// Health endpoints disagree about bodies: some return JSON, some plain
/// text, some nothing at all. A 2xx with an unparseable body still counts
/// as healthy.
async fn parse_health_body(response: reqwest::Response) -> serde_json::Value {
    match response.text().await {
        Ok(text) if text.is_empty() => serde_json::json!({"status": "ok"}),
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(
            |_| serde_json::json!({"status": "ok", "raw": true}),
        ),
        Err(_) => serde_json::json!({"status": "ok"}),
    }
}
