use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completed (or in-flight) run as persisted by the workflow, one row per
/// execution, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionRecord {
    pub id: String,
    pub status: String,
    pub dataset_name: String,
    pub dataset_rows: u64,
    pub impact_score: f64,
    pub confidence: f64,
    pub duration: String,
    pub start_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiInsight {
    pub id: String,
    pub execution_id: String,
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub id: String,
    pub execution_id: String,
    pub impact_score: f64,
    pub confidence: f64,
    pub threshold: f64,
    pub urgent: bool,
    pub actions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Impact score at or above which a run counts as an automation trigger.
pub const AUTOMATION_IMPACT_THRESHOLD: f64 = 75.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardStats {
    pub total_executions: u64,
    pub insights_generated: u64,
    pub automations_triggered: u64,
    /// Percentage of runs with status "success", one decimal place.
    pub success_rate: String,
}

/// Execution together with the artifacts the workflow produced for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionDetail {
    #[serde(flatten)]
    pub record: ExecutionRecord,
    pub ai_insights: Vec<AiInsight>,
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub latest_execution: Option<ExecutionDetail>,
    pub execution_history: Vec<ExecutionDetail>,
}

impl DashboardStats {
    /// Derive the stat tiles from the full execution set.
    pub fn from_records(
        records: &[ExecutionRecord],
        insights_generated: u64,
    ) -> Self {
        let total = records.len() as u64;
        let successes =
            records.iter().filter(|r| r.status == "success").count();
        let success_rate = if total > 0 {
            format!("{:.1}", (successes as f64 / total as f64) * 100.0)
        } else {
            "0".to_string()
        };
        Self {
            total_executions: total,
            insights_generated,
            automations_triggered: records
                .iter()
                .filter(|r| r.impact_score >= AUTOMATION_IMPACT_THRESHOLD)
                .count() as u64,
            success_rate,
        }
    }
}
