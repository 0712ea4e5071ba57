//! Aggregate rows produced by the reporting queries.

use bcpms_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Number of projects (and their summed estimated value) in one stage.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: String,
    pub count: i64,
    pub total_value: f64,
}

/// Number of tasks sharing one `status` or `priority` value.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    pub key: String,
    pub count: i64,
}

/// Organisation-wide counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub projects_by_stage: Vec<StageCount>,
    pub tasks_by_status: Vec<BucketCount>,
    pub overdue_tasks: i64,
}

/// Sales funnel across the pipeline stages, in stage order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub stages: Vec<StageCount>,
    pub open_value: f64,
}

/// Task breakdown for a single project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_id: DbId,
    pub total_tasks: i64,
    pub tasks_by_status: Vec<BucketCount>,
    pub tasks_by_priority: Vec<BucketCount>,
    pub overdue_tasks: i64,
}

/// Fill `counts` out to one bucket per `keys` entry, in `keys` order.
pub fn fill_buckets(keys: &[&str], counts: &[BucketCount]) -> Vec<BucketCount> {
    keys.iter()
        .map(|key| BucketCount {
            key: (*key).to_string(),
            count: counts
                .iter()
                .find(|c| c.key == *key)
                .map_or(0, |c| c.count),
        })
        .collect()
}

/// Fill `counts` out to one row per `stages` entry, in `stages` order.
pub fn fill_stages(stages: &[&str], counts: &[StageCount]) -> Vec<StageCount> {
    stages
        .iter()
        .map(|stage| {
            counts
                .iter()
                .find(|c| c.stage == *stage)
                .cloned()
                .unwrap_or_else(|| StageCount {
                    stage: (*stage).to_string(),
                    count: 0,
                    total_value: 0.0,
                })
        })
        .collect()
}
