use crate::error::StoreError;
use async_trait::async_trait;
use insight_models::{AiInsight, Decision, ExecutionRecord};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Lightweight connectivity check to the backing datastore.
    async fn health(&self) -> StoreResult<()>;
}

/// Execution run records, newest first.
#[async_trait]
pub trait ExecutionStore: Send + Sync + StoreHealth {
    async fn insert_execution(
        &self,
        record: &ExecutionRecord,
    ) -> StoreResult<()>;
    async fn get_execution(
        &self,
        id: &str,
    ) -> StoreResult<Option<ExecutionRecord>>;
    /// Ordered by `created_at` descending; `limit` of `None` returns all.
    async fn list_executions(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<ExecutionRecord>>;
    async fn delete_execution(&self, id: &str) -> StoreResult<()>;
}

/// AI-generated insight text, keyed by execution.
#[async_trait]
pub trait InsightStore: Send + Sync + StoreHealth {
    async fn insert_insight(&self, insight: &AiInsight) -> StoreResult<()>;
    async fn insights_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<AiInsight>>;
    async fn count_insights(&self) -> StoreResult<u64>;
    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()>;
}

/// Automated-decision records, keyed by execution.
#[async_trait]
pub trait DecisionStore: Send + Sync + StoreHealth {
    async fn insert_decision(&self, decision: &Decision) -> StoreResult<()>;
    async fn decisions_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<Decision>>;
    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()>;
}

/// The three record sets the dashboard reads, bundled for injection.
#[derive(Clone)]
pub struct Datastore {
    pub executions: Arc<dyn ExecutionStore>,
    pub insights: Arc<dyn InsightStore>,
    pub decisions: Arc<dyn DecisionStore>,
}

impl Datastore {
    pub async fn health(&self) -> StoreResult<()> {
        self.executions.health().await
    }
}
