use learnify_core::model::{CourseId, Lesson, LessonId};

use super::SqliteRepository;
use super::mapping::{db, id_from_row, map_lesson_row};
use crate::repository::{LessonRepository, StorageError};

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO lessons (id, module_id, title, content_type, sequence_order, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                module_id = excluded.module_id,
                title = excluded.title,
                content_type = excluded.content_type,
                sequence_order = excluded.sequence_order
            ",
        )
        .bind(lesson.id().to_string())
        .bind(lesson.module_id().to_string())
        .bind(lesson.title())
        .bind(lesson.content_type())
        .bind(lesson.sequence_order().map(i64::from))
        .bind(lesson.created_at())
        .execute(&self.pool)
        .await
        .map_err(db)?;

        Ok(())
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, module_id, title, content_type, sequence_order, created_at
            FROM lessons
            WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;

        row.as_ref().map(map_lesson_row).transpose()
    }

    async fn lesson_ids_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<LessonId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT l.id AS id
            FROM lessons l
            JOIN modules m ON m.id = l.module_id
            WHERE m.course_id = ?1
            ORDER BY l.id ASC
            ",
        )
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.iter()
            .map(|row| id_from_row::<LessonId>(row, "id"))
            .collect()
    }
}
