use bcpms_core::types::Timestamp;
use bcpms_db::models::report::OverviewReport;
use bcpms_db::repositories::CalendarEventRepo;
use bcpms_db::Database;
use chrono::Duration;
use serde::Serialize;

use crate::error::AppResult;
use crate::modules::calendar::{Occurrence, RRuleService};
use crate::modules::report::ReportService;

/// How far ahead the summary looks for occurrences.
pub const UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub overview: OverviewReport,
    pub upcoming: Vec<Occurrence>,
    pub window_start: Timestamp,
    pub window_end: Timestamp,
}

#[derive(Clone)]
pub struct DashboardService {
    db: Database,
    reports: ReportService,
    rrule: RRuleService,
}

impl DashboardService {
    pub fn new(db: Database, reports: ReportService, rrule: RRuleService) -> Self {
        Self { db, reports, rrule }
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let overview = self.reports.overview().await?;

        let window_start = chrono::Utc::now();
        let window_end = window_start + Duration::days(UPCOMING_DAYS);
        let events =
            CalendarEventRepo::list_candidates(self.db.pool(), window_start, window_end, None).await?;
        let upcoming = self.rrule.expand_events(&events, window_start, window_end);

        Ok(DashboardSummary {
            overview,
            upcoming,
            window_start,
            window_end,
        })
    }
}
