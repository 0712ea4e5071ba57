use bcpms_core::error::CoreError;
use bcpms_core::stages::{ProjectStage, PIPELINE_STAGES, PROJECT_STAGES, TASK_PRIORITIES, TASK_STATUSES};
use bcpms_core::types::DbId;
use bcpms_db::models::report::{
    fill_buckets, fill_stages, OverviewReport, PipelineReport, ProjectReport, StageCount,
};
use bcpms_db::repositories::{ProjectRepo, ReportRepo};
use bcpms_db::Database;

use crate::error::AppResult;

#[derive(Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every stage, every task status, and the overdue count.
    pub async fn overview(&self) -> AppResult<OverviewReport> {
        let pool = self.db.pool();
        let stages = ReportRepo::stage_counts(pool, None).await?;
        let statuses = ReportRepo::task_status_counts(pool, None).await?;
        let overdue_tasks = ReportRepo::overdue_task_count(pool, None).await?;
        Ok(OverviewReport {
            projects_by_stage: fill_stages(PROJECT_STAGES, &stages),
            tasks_by_status: fill_buckets(TASK_STATUSES, &statuses),
            overdue_tasks,
        })
    }

    /// Funnel over unconverted entries.
    pub async fn pipeline(&self) -> AppResult<PipelineReport> {
        let counts = ReportRepo::stage_counts(self.db.pool(), Some(false)).await?;
        let stages = fill_stages(PIPELINE_STAGES, &counts);
        let open_value = open_value(&stages);
        Ok(PipelineReport { stages, open_value })
    }

    pub async fn project(&self, id: DbId) -> AppResult<ProjectReport> {
        let pool = self.db.pool();
        ProjectRepo::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;

        let statuses = ReportRepo::task_status_counts(pool, Some(id)).await?;
        let priorities = ReportRepo::task_priority_counts(pool, Some(id)).await?;
        let overdue_tasks = ReportRepo::overdue_task_count(pool, Some(id)).await?;
        Ok(ProjectReport {
            project_id: id,
            total_tasks: statuses.iter().map(|b| b.count).sum(),
            tasks_by_status: fill_buckets(TASK_STATUSES, &statuses),
            tasks_by_priority: fill_buckets(TASK_PRIORITIES, &priorities),
            overdue_tasks,
        })
    }
}

/// Estimated value still in play: everything not yet won or lost.
fn open_value(stages: &[StageCount]) -> f64 {
    stages
        .iter()
        .filter(|s| s.stage != ProjectStage::Won.as_str() && s.stage != ProjectStage::Lost.as_str())
        .map(|s| s.total_value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stage: &str, total_value: f64) -> StageCount {
        StageCount {
            stage: stage.to_string(),
            count: 1,
            total_value,
        }
    }

    #[test]
    fn open_value_excludes_closed_stages() {
        let stages = vec![
            row("lead", 1000.0),
            row("proposal", 2500.0),
            row("won", 9000.0),
            row("lost", 400.0),
        ];
        assert_eq!(open_value(&stages), 3500.0);
    }
}
