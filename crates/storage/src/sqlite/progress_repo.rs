use learnify_core::model::{LessonActivity, LessonId, LessonProgress, UserId};

use super::SqliteRepository;
use super::mapping::{bool_to_i64, db, map_activity_row, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

const PROGRESS_COLUMNS: &str = "id, user_id, lesson_id, progress, is_completed, \
     last_watched_at, completed_at, created_at, updated_at";

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM lesson_progress WHERE user_id = ?1 AND lesson_id = ?2"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(lesson_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn upsert_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, StorageError> {
        // The WHERE on DO UPDATE is the no-regression guard; when it rejects
        // the write nothing is returned and the stored row wins.
        let sql = format!(
            r"
            INSERT INTO lesson_progress (
                id, user_id, lesson_id, progress, is_completed,
                last_watched_at, completed_at, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id, lesson_id) DO UPDATE SET
                progress = excluded.progress,
                is_completed = excluded.is_completed,
                last_watched_at = excluded.last_watched_at,
                completed_at = excluded.completed_at,
                updated_at = excluded.updated_at
            WHERE excluded.progress > lesson_progress.progress
               OR excluded.is_completed <> lesson_progress.is_completed
            RETURNING {PROGRESS_COLUMNS}
            "
        );
        let row = sqlx::query(&sql)
            .bind(progress.id().to_string())
            .bind(progress.user_id().to_string())
            .bind(progress.lesson_id().to_string())
            .bind(progress.progress())
            .bind(bool_to_i64(progress.is_completed()))
            .bind(progress.last_watched_at())
            .bind(progress.completed_at())
            .bind(progress.created_at())
            .bind(progress.updated_at())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;

        match row {
            Some(row) => map_progress_row(&row),
            None => self
                .get_progress(progress.user_id(), progress.lesson_id())
                .await?
                .ok_or(StorageError::NotFound),
        }
    }

    async fn count_completed(
        &self,
        user_id: UserId,
        lesson_ids: &[LessonId],
    ) -> Result<u32, StorageError> {
        if lesson_ids.is_empty() {
            return Ok(0);
        }

        let mut sql = String::from(
            r"
            SELECT COUNT(*) AS completed
            FROM lesson_progress
            WHERE user_id = ?1
              AND is_completed = 1
              AND lesson_id IN (
            ",
        );
        for i in 0..lesson_ids.len() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('?');
            sql.push_str(&(i + 2).to_string());
        }
        sql.push(')');

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id.to_string());
        for lesson_id in lesson_ids {
            query = query.bind(lesson_id.to_string());
        }

        let count = query.fetch_one(&self.pool).await.map_err(db)?;
        u32::try_from(count)
            .map_err(|_| StorageError::Serialization(format!("invalid completed count: {count}")))
    }

    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<LessonActivity>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                lp.id, lp.user_id, lp.lesson_id, lp.progress, lp.is_completed,
                lp.last_watched_at, lp.completed_at, lp.created_at, lp.updated_at,
                l.title AS lesson_title,
                l.content_type AS content_type,
                m.title AS module_title,
                c.title AS course_title
            FROM lesson_progress lp
            JOIN lessons l ON l.id = lp.lesson_id
            JOIN modules m ON m.id = l.module_id
            JOIN courses c ON c.id = m.course_id
            WHERE lp.user_id = ?1
            ORDER BY
                COALESCE(lp.completed_at, lp.last_watched_at, lp.created_at) DESC,
                lp.created_at DESC,
                lp.id DESC
            LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.iter().map(map_activity_row).collect()
    }
}
