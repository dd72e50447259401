use chrono::NaiveDate;
use sqlx::Row;

use reps_core::model::{ProfileCode, SessionRecord};

use super::SqliteRepository;
use super::mapping::{conn, ser, u32_from_i64};
use crate::repository::{SessionRepository, StorageError};

fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<SessionRecord, StorageError> {
    let local_date: NaiveDate = row.try_get("local_date").map_err(ser)?;
    let correct = u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let duration_sec = u32_from_i64(
        "duration_sec",
        row.try_get::<i64, _>("duration_sec").map_err(ser)?,
    )?;
    let created_at = row.try_get("created_at").map_err(ser)?;

    SessionRecord::from_persisted(local_date, correct, total, duration_sec, created_at)
        .map_err(ser)
}

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn append_session(
        &self,
        code: &ProfileCode,
        record: &SessionRecord,
    ) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO sessions (
                    profile_code, local_date, correct, total, duration_sec, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(code.as_str())
        .bind(record.local_date())
        .bind(i64::from(record.correct()))
        .bind(i64::from(record.total()))
        .bind(i64::from(record.duration_sec()))
        .bind(record.created_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn list_sessions(&self, code: &ProfileCode) -> Result<Vec<SessionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT local_date, correct, total, duration_sec, created_at
                FROM sessions
                WHERE profile_code = ?1
                ORDER BY local_date ASC, id ASC
            ",
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_session_row(&row)?);
        }
        Ok(out)
    }
}
