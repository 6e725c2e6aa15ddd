use async_trait::async_trait;
use insight_models::{AiInsight, Decision, ExecutionRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::traits::*;

type MemoryStore<T> = Arc<RwLock<HashMap<String, T>>>;

#[derive(Clone, Default)]
pub struct MemoryExecutionStore {
    store: MemoryStore<ExecutionRecord>,
}

#[derive(Clone, Default)]
pub struct MemoryInsightStore {
    store: MemoryStore<AiInsight>,
}

#[derive(Clone, Default)]
pub struct MemoryDecisionStore {
    store: MemoryStore<Decision>,
}

impl MemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreHealth for MemoryExecutionStore {
    async fn health(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ExecutionStore for MemoryExecutionStore {
    async fn insert_execution(
        &self,
        record: &ExecutionRecord,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get_execution(
        &self,
        id: &str,
    ) -> StoreResult<Option<ExecutionRecord>> {
        let store = self.store.read().await;
        Ok(store.get(id).cloned())
    }

    async fn list_executions(
        &self,
        limit: Option<usize>,
    ) -> StoreResult<Vec<ExecutionRecord>> {
        let store = self.store.read().await;
        let mut records: Vec<ExecutionRecord> =
            store.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn delete_execution(&self, id: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.remove(id);
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryInsightStore {
    async fn health(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn insert_insight(&self, insight: &AiInsight) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.insert(insight.id.clone(), insight.clone());
        Ok(())
    }

    async fn insights_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<AiInsight>> {
        let store = self.store.read().await;
        let mut insights: Vec<AiInsight> = store
            .values()
            .filter(|insight| insight.execution_id == execution_id)
            .cloned()
            .collect();
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }

    async fn count_insights(&self) -> StoreResult<u64> {
        let store = self.store.read().await;
        Ok(store.len() as u64)
    }

    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.retain(|_, insight| insight.execution_id != execution_id);
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryDecisionStore {
    async fn health(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl DecisionStore for MemoryDecisionStore {
    async fn insert_decision(&self, decision: &Decision) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.insert(decision.id.clone(), decision.clone());
        Ok(())
    }

    async fn decisions_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<Vec<Decision>> {
        let store = self.store.read().await;
        let mut decisions: Vec<Decision> = store
            .values()
            .filter(|decision| decision.execution_id == execution_id)
            .cloned()
            .collect();
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decisions)
    }

    async fn delete_for_execution(
        &self,
        execution_id: &str,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        store.retain(|_, decision| decision.execution_id != execution_id);
        Ok(())
    }
}

/// Bundle all three in-memory record sets.
pub fn memory_datastore() -> Datastore {
    Datastore {
        executions: Arc::new(MemoryExecutionStore::new()),
        insights: Arc::new(MemoryInsightStore::new()),
        decisions: Arc::new(MemoryDecisionStore::new()),
    }
}
