use bcpms_core::error::CoreError;
use bcpms_core::stages::BriefAction;
use bcpms_core::types::{new_id, parse_optional_id, DbId};
use bcpms_db::models::brief::{
    BriefParent, BriefWithRevisions, CreateBriefDto, RequestRevisionDto, StrategicBrief,
    UpdateBriefDto,
};
use bcpms_db::repositories::BriefRepo;
use bcpms_db::Database;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct BriefService {
    db: Database,
}

impl BriefService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        project_id: Option<DbId>,
        pipeline_id: Option<DbId>,
    ) -> AppResult<Vec<StrategicBrief>> {
        Ok(BriefRepo::list(self.db.pool(), project_id, pipeline_id).await?)
    }

    /// Create a draft brief.
    ///
    /// At most one parent id may be given. A pipeline parent must be an
    /// unconverted entry and a project parent a converted project.
    pub async fn create(&self, input: CreateBriefDto) -> AppResult<StrategicBrief> {
        let parent = resolve_parent(&input)?;

        let brief = BriefRepo::create(self.db.pool(), new_id(), parent, &input)
            .await?
            .ok_or_else(|| match parent {
                BriefParent::Pipeline(id) => AppError::Core(CoreError::NotFound {
                    entity: "PipelineEntry",
                    id,
                }),
                BriefParent::Project(id) => AppError::Core(CoreError::NotFound {
                    entity: "Project",
                    id,
                }),
                BriefParent::Unattached => {
                    AppError::InternalError("Unattached brief insert returned no row".to_string())
                }
            })?;
        tracing::info!(brief_id = %brief.id, ?parent, "Strategic brief created");
        Ok(brief)
    }

    pub async fn get(&self, id: DbId) -> AppResult<StrategicBrief> {
        BriefRepo::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn get_with_revisions(&self, id: DbId) -> AppResult<BriefWithRevisions> {
        let brief = self.get(id).await?;
        let revisions = BriefRepo::list_revisions(self.db.pool(), id).await?;
        Ok(BriefWithRevisions { brief, revisions })
    }

    pub async fn update(&self, id: DbId, input: UpdateBriefDto) -> AppResult<StrategicBrief> {
        if let Some(brief) = BriefRepo::update(self.db.pool(), id, &input).await? {
            tracing::info!(brief_id = %id, "Strategic brief updated");
            return Ok(brief);
        }
        // Missing, or approved and therefore frozen.
        let brief = self.get(id).await?;
        Err(CoreError::Conflict(format!(
            "Brief {id} is '{}' and can no longer be edited",
            brief.status
        ))
        .into())
    }

    pub async fn submit(&self, id: DbId) -> AppResult<StrategicBrief> {
        self.transition(id, BriefAction::Submit).await
    }

    pub async fn approve(&self, id: DbId) -> AppResult<StrategicBrief> {
        self.transition(id, BriefAction::Approve).await
    }

    /// Send a submitted brief back with a reviewer comment.
    pub async fn request_revision(
        &self,
        id: DbId,
        input: RequestRevisionDto,
    ) -> AppResult<StrategicBrief> {
        let brief = self.get(id).await?;
        brief.status()?.apply(BriefAction::RequestRevision)?;

        let updated = BriefRepo::request_revision(self.db.pool(), id, new_id(), &input.comment)
            .await?
            .ok_or_else(|| concurrent_change(id))?;
        tracing::info!(brief_id = %id, "Strategic brief revision requested");
        Ok(updated)
    }

    async fn transition(&self, id: DbId, action: BriefAction) -> AppResult<StrategicBrief> {
        let brief = self.get(id).await?;
        let from = brief.status()?;
        let to = from.apply(action)?;

        let updated = BriefRepo::transition(self.db.pool(), id, from, to)
            .await?
            .ok_or_else(|| concurrent_change(id))?;
        tracing::info!(brief_id = %id, %from, %to, "Strategic brief status changed");
        Ok(updated)
    }
}

/// Resolve the optional wire ids into a parent. Supplying both is rejected.
fn resolve_parent(input: &CreateBriefDto) -> Result<BriefParent, CoreError> {
    let pipeline_id = parse_optional_id("pipelineId", input.pipeline_id.as_deref())?;
    let project_id = parse_optional_id("projectId", input.project_id.as_deref())?;
    match (pipeline_id, project_id) {
        (Some(_), Some(_)) => Err(CoreError::Validation(
            "A brief belongs to either a pipeline entry or a project, not both".to_string(),
        )),
        (Some(id), None) => Ok(BriefParent::Pipeline(id)),
        (None, Some(id)) => Ok(BriefParent::Project(id)),
        (None, None) => Ok(BriefParent::Unattached),
    }
}

fn concurrent_change(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Brief {id} changed status concurrently; reload and retry"
    )))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "StrategicBrief",
        id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn dto(pipeline_id: Option<&str>, project_id: Option<&str>) -> CreateBriefDto {
        CreateBriefDto {
            pipeline_id: pipeline_id.map(str::to_string),
            project_id: project_id.map(str::to_string),
            title: None,
            objectives: None,
            target_audience: None,
            key_messages: None,
        }
    }

    const A: &str = "01890a5d-ac96-774b-bcce-b302099a8057";
    const B: &str = "01890a5d-ac96-774b-bcce-b302099a8058";

    #[test]
    fn both_parents_is_rejected() {
        assert_matches!(
            resolve_parent(&dto(Some(A), Some(B))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn single_or_no_parent_resolves() {
        assert_matches!(resolve_parent(&dto(Some(A), None)), Ok(BriefParent::Pipeline(_)));
        assert_matches!(resolve_parent(&dto(None, Some(B))), Ok(BriefParent::Project(_)));
        assert_eq!(resolve_parent(&dto(None, None)).unwrap(), BriefParent::Unattached);
    }

    #[test]
    fn malformed_parent_id_is_a_field_error() {
        assert_matches!(
            resolve_parent(&dto(Some("abc"), None)),
            Err(CoreError::InvalidFields(_))
        );
    }
}
