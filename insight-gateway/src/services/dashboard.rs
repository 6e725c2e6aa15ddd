use insight_models::{DashboardData, DashboardStats, ExecutionDetail, ExecutionRecord};
use insight_monitor::RateLimitGate;
use insight_store::{Datastore, StoreResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// How many history rows the dashboard shows.
const HISTORY_LIMIT: usize = 5;

/// Aggregates the three record sets into the dashboard view.
///
/// Reads are best-effort: datastore failure degrades to the last good view
/// (or an empty one) instead of propagating an error, and the refresh gate
/// deduplicates bursts of identical reads from concurrent dashboard
/// components.
pub struct DashboardService {
    store: Datastore,
    refresh_gate: Arc<RateLimitGate>,
    cache: RwLock<Option<DashboardData>>,
}

impl DashboardService {
    pub fn new(store: Datastore, refresh_gate: Arc<RateLimitGate>) -> Self {
        Self {
            store,
            refresh_gate,
            cache: RwLock::new(None),
        }
    }

    pub async fn dashboard(&self) -> DashboardData {
        if !self.refresh_gate.try_acquire() {
            if let Some(cached) = self.cache.read().await.clone() {
                debug!("dashboard refresh rate limited, serving cached view");
                return cached;
            }
        }

        match self.build().await {
            Ok(data) => {
                *self.cache.write().await = Some(data.clone());
                data
            }
            Err(e) => {
                warn!(error = %e, "dashboard read degraded");
                self.cache.read().await.clone().unwrap_or_default()
            }
        }
    }

    async fn build(&self) -> StoreResult<DashboardData> {
        let records = self.store.executions.list_executions(None).await?;
        let insights_generated =
            self.store.insights.count_insights().await?;
        let stats = DashboardStats::from_records(&records, insights_generated);

        let mut execution_history = Vec::new();
        for record in records.into_iter().take(HISTORY_LIMIT) {
            execution_history.push(self.attach_artifacts(record).await?);
        }

        Ok(DashboardData {
            stats,
            latest_execution: execution_history.first().cloned(),
            execution_history,
        })
    }

    pub async fn execution_detail(
        &self,
        id: &str,
    ) -> StoreResult<Option<ExecutionDetail>> {
        let Some(record) = self.store.executions.get_execution(id).await?
        else {
            return Ok(None);
        };
        Ok(Some(self.attach_artifacts(record).await?))
    }

    /// Delete a run and everything the workflow derived from it. The
    /// related-record deletions are best-effort, matching the read side.
    pub async fn delete_execution(&self, id: &str) -> StoreResult<()> {
        self.store.executions.delete_execution(id).await?;

        if let Err(e) = self.store.insights.delete_for_execution(id).await {
            warn!(execution_id = id, error = %e, "failed to delete related insights");
        }
        if let Err(e) = self.store.decisions.delete_for_execution(id).await {
            warn!(execution_id = id, error = %e, "failed to delete related decisions");
        }
        Ok(())
    }

    async fn attach_artifacts(
        &self,
        record: ExecutionRecord,
    ) -> StoreResult<ExecutionDetail> {
        let ai_insights = self
            .store
            .insights
            .insights_for_execution(&record.id)
            .await?;
        let decisions = self
            .store
            .decisions
            .decisions_for_execution(&record.id)
            .await?;
        Ok(ExecutionDetail {
            record,
            ai_insights,
            decisions,
        })
    }
}
