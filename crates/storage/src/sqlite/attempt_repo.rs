use chrono::{DateTime, Utc};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{AttemptRecord, AttemptRepository, StorageError};

fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRecord, StorageError> {
    Ok(AttemptRecord {
        play_id: row.try_get("play_id").map_err(ser)?,
        item_id: row.try_get("item_id").map_err(ser)?,
        item_type: row.try_get("item_type").map_err(ser)?,
        correct: row.try_get::<i64, _>("correct").map_err(ser)? != 0,
        response: row.try_get("response").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, record: &AttemptRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO attempts (
                    play_id, item_id, item_type, correct, response, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(&record.play_id)
        .bind(&record.item_id)
        .bind(&record.item_type)
        .bind(i64::from(record.correct))
        .bind(&record.response)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn mark_play_completed(
        &self,
        play_id: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO plays (play_id, completed_at)
                VALUES (?1, ?2)
                ON CONFLICT(play_id) DO UPDATE SET completed_at = excluded.completed_at
            ",
        )
        .bind(play_id)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn list_attempts(&self, play_id: &str) -> Result<Vec<AttemptRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT play_id, item_id, item_type, correct, response, created_at
                FROM attempts
                WHERE play_id = ?1
                ORDER BY id ASC
            ",
        )
        .bind(play_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
