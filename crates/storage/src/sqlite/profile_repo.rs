use chrono::{DateTime, Utc};

use reps_core::model::ProfileCode;

use super::SqliteRepository;
use super::mapping::conn;
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn ensure_profile(
        &self,
        code: &ProfileCode,
        created_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO profiles (code, created_at)
                VALUES (?1, ?2)
                ON CONFLICT(code) DO NOTHING
            ",
        )
        .bind(code.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn profile_exists(&self, code: &ProfileCode) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM profiles WHERE code = ?1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }
}
