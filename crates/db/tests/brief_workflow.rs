//! Integration tests for brief creation checks and revision history.
//!
//! Need a live database (`DATABASE_URL`); run with `cargo test -- --ignored`.

use bcpms_core::stages::BriefStatus;
use bcpms_core::types::new_id;
use bcpms_db::models::brief::{BriefParent, CreateBriefDto, UpdateBriefDto};
use bcpms_db::models::project::CreatePipelineEntryDto;
use bcpms_db::repositories::{BriefRepo, ProjectRepo};
use sqlx::PgPool;

fn brief_input() -> CreateBriefDto {
    CreateBriefDto {
        pipeline_id: None,
        project_id: None,
        title: Some("Q3 launch".to_string()),
        objectives: Some("Awareness".to_string()),
        target_audience: None,
        key_messages: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_checks_parent_kind(pool: PgPool) {
    let lead = CreatePipelineEntryDto {
        name: "Lead".to_string(),
        description: None,
        client_name: None,
        stage: None,
        estimated_value: None,
    };
    let entry = ProjectRepo::create_pipeline_entry(&pool, new_id(), &lead).await.unwrap();

    // A pipeline entry is not a project.
    let wrong = BriefRepo::create(&pool, new_id(), BriefParent::Project(entry.id), &brief_input())
        .await
        .unwrap();
    assert!(wrong.is_none());

    let missing = BriefRepo::create(&pool, new_id(), BriefParent::Pipeline(new_id()), &brief_input())
        .await
        .unwrap();
    assert!(missing.is_none());

    let ok = BriefRepo::create(&pool, new_id(), BriefParent::Pipeline(entry.id), &brief_input())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ok.status, "draft");
    assert_eq!(ok.pipeline_id, Some(entry.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn revision_round_trip_records_comment(pool: PgPool) {
    let brief = BriefRepo::create(&pool, new_id(), BriefParent::Unattached, &brief_input())
        .await
        .unwrap()
        .unwrap();

    assert!(BriefRepo::request_revision(&pool, brief.id, new_id(), "too early")
        .await
        .unwrap()
        .is_none());

    BriefRepo::transition(&pool, brief.id, BriefStatus::Draft, BriefStatus::Submitted)
        .await
        .unwrap()
        .unwrap();
    let revising = BriefRepo::request_revision(&pool, brief.id, new_id(), "Sharpen the audience")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(revising.status, "revision_requested");

    let revisions = BriefRepo::list_revisions(&pool, brief.id).await.unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].comment, "Sharpen the audience");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn approved_brief_is_frozen(pool: PgPool) {
    let brief = BriefRepo::create(&pool, new_id(), BriefParent::Unattached, &brief_input())
        .await
        .unwrap()
        .unwrap();
    BriefRepo::transition(&pool, brief.id, BriefStatus::Draft, BriefStatus::Submitted)
        .await
        .unwrap()
        .unwrap();
    BriefRepo::transition(&pool, brief.id, BriefStatus::Submitted, BriefStatus::Approved)
        .await
        .unwrap()
        .unwrap();

    let edit = UpdateBriefDto {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    assert!(BriefRepo::update(&pool, brief.id, &edit).await.unwrap().is_none());
}
