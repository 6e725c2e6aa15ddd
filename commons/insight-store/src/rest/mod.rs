//! PostgREST-style backend for the hosted datastore.
//!
//! Tables are addressed as `{base}/rest/v1/{table}`; filters use the
//! `column=eq.value` form and ordering is `order=created_at.desc`.

use async_trait::async_trait;
use insight_models::{AiInsight, Decision, ExecutionRecord};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::*;

#[derive(Debug, Clone)]
pub struct RestDatastoreConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct RestDatastore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestDatastore {
    pub fn new(config: RestDatastoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .bearer_auth(key),
            None => request,
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let response = self
            .authorize(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            debug!(table, %status, "datastore select failed");
            return Err(StoreError::Backend(format!(
                "select from {} failed: {}",
                table, status
            )));
        }
        Ok(response.json().await?)
    }

    async fn insert<T: Serialize>(
        &self,
        table: &str,
        row: &T,
    ) -> StoreResult<()> {
        let response = self
            .authorize(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend(format!(
                "insert into {} failed: {}",
                table, status
            )));
        }
        Ok(())
    }

    async fn delete_where(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> StoreResult<()> {
        let response = self
            .authorize(self.client.delete(self.table_url(table)))
            .query(&[(column, format!("eq.{}", value))])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Backend(format!(
                "delete from {} failed: {}",
                table, status
            )));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let response = self
            .authorize(self.client.get(format!("{}/rest/v1/", self.base_url)))
            .send()
            .await?;
        if response.status().is_server_error() {
            return Err(StoreError::Connection(format!(
                "datastore responded {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct RestExecutionStore {
    inner: RestDatastore,
}

#[derive(Clone)]
pub struct RestInsightStore {
    inner: RestDatastore,
}

#[derive(Clone)]
pub struct RestDecisionStore {
    inner: RestDatastore,
}

#[async_trait]
impl StoreHealth for RestExecutionStore {
    async fn health(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

#[async_trait]
impl ExecutionStore for RestExecutionStore {
    async fn insert_execution(
        &self,
        record: &ExecutionRecord,
    ) -> StoreResult<()> {
        self.inner.insert("executions", record).await
    }

    async fn get_execution(
        &self,
        id: &str,
    ) -> StoreResult<Option<ExecutionRecord>> {
        let rows: Vec<ExecutionRecord> = self
            .inner
            .select("executions", &[("id", format!("eq.{}", id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_executions(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<ExecutionRecord>> {
        let mut query =
            vec![("order", "created_at.desc".to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.inner.select("executions", &query).await
    }

    async fn delete_execution(&self, id: &str) -> StoreResult<()> {
        self.inner.delete_where("executions", "id", id).await
    }
}

#[async_trait]
impl StoreHealth for RestInsightStore {
    async fn health(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

#[async_trait]
impl InsightStore for RestInsightStore {
    async fn insert_insight(&self, insight: &AiInsight) -> StoreResult<()> {
        self.inner.insert("ai_insights", insight).await
    }

    async fn insights_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<AiInsight>> {
        self.inner
            .select(
                "ai_insights",
                &[
                    ("execution_id", format!("eq.{}", execution_id)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn count_insights(&self) -> StoreResult<u64> {
        // PostgREST exposes counts via a HEAD request; a full select keeps
        // the client surface small and the table stays dashboard-sized.
        let rows: Vec<serde_json::Value> =
            self.inner.select("ai_insights", &[("select", "id".to_string())]).await?;
        Ok(rows.len() as u64)
    }

    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()> {
        self.inner
            .delete_where("ai_insights", "execution_id", execution_id)
            .await
    }
}

#[async_trait]
impl StoreHealth for RestDecisionStore {
    async fn health(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

#[async_trait]
impl DecisionStore for RestDecisionStore {
    async fn insert_decision(&self, decision: &Decision) -> StoreResult<()> {
        self.inner.insert("decisions", decision).await
    }

    async fn decisions_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<Decision>> {
        self.inner
            .select(
                "decisions",
                &[
                    ("execution_id", format!("eq.{}", execution_id)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()> {
        self.inner
            .delete_where("decisions", "execution_id", execution_id)
            .await
    }
}

/// Bundle the three REST-backed record sets over one shared client.
pub fn rest_datastore(
    config: RestDatastoreConfig,
) -> Result<Datastore, StoreError> {
    let inner = RestDatastore::new(config)?;
    Ok(Datastore {
        executions: Arc::new(RestExecutionStore {
            inner: inner.clone(),
        }),
        insights: Arc::new(RestInsightStore {
            inner: inner.clone(),
        }),
        decisions: Arc::new(RestDecisionStore { inner }),
    })
}
