//! Repository for the `files` table.

use bcpms_core::types::DbId;
use sqlx::PgPool;

use crate::models::file::{CreateFileRecord, FileRecord};

const COLUMNS: &str = "id, project_id, original_name, content_type, size_bytes, storage_key, created_at";

pub struct FileRepo;

impl FileRepo {
    pub async fn create(pool: &PgPool, input: &CreateFileRecord) -> Result<FileRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO files (id, project_id, original_name, content_type, size_bytes, storage_key)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(input.id)
            .bind(input.project_id)
            .bind(&input.original_name)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(&input.storage_key)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List files, newest first, optionally for one project.
    pub async fn list(pool: &PgPool, project_id: Option<DbId>) -> Result<Vec<FileRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM files
             WHERE ($1::UUID IS NULL OR project_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
