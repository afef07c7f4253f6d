use chrono::{DateTime, Utc};
use learnify_core::model::{
    Course, CourseId, Lesson, LessonActivity, LessonId, LessonProgress, LessonProgressId, Module,
    ModuleId, UserId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps driver failures onto storage errors.
///
/// Constraint violations mean a missing parent row or a taken unique key.
pub(crate) fn db(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(ref inner) = e {
        if matches!(
            inner.kind(),
            sqlx::error::ErrorKind::ForeignKeyViolation | sqlx::error::ErrorKind::UniqueViolation
        ) {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

fn uuid_from_text(field: &'static str, raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw)
        .map_err(|e| StorageError::Serialization(format!("invalid {field} `{raw}`: {e}")))
}

pub(crate) fn id_from_row<T: From<Uuid>>(
    row: &SqliteRow,
    field: &'static str,
) -> Result<T, StorageError> {
    let raw: String = row.try_get(field).map_err(ser)?;
    uuid_from_text(field, &raw).map(T::from)
}

fn order_from_row(row: &SqliteRow) -> Result<Option<i32>, StorageError> {
    row.try_get::<Option<i64>, _>("sequence_order")
        .map_err(ser)?
        .map(|v| {
            i32::try_from(v)
                .map_err(|_| StorageError::Serialization(format!("invalid sequence_order: {v}")))
        })
        .transpose()
}

pub(crate) fn bool_to_i64(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    Course::new(
        id_from_row::<CourseId>(row, "id")?,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_module_row(row: &SqliteRow) -> Result<Module, StorageError> {
    Module::new(
        id_from_row::<ModuleId>(row, "id")?,
        id_from_row::<CourseId>(row, "course_id")?,
        row.try_get("title").map_err(ser)?,
        order_from_row(row)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    Lesson::new(
        id_from_row::<LessonId>(row, "id")?,
        id_from_row::<ModuleId>(row, "module_id")?,
        row.try_get("title").map_err(ser)?,
        row.try_get("content_type").map_err(ser)?,
        order_from_row(row)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<LessonProgress, StorageError> {
    let is_completed: i64 = row.try_get("is_completed").map_err(ser)?;
    let last_watched_at: Option<DateTime<Utc>> = row.try_get("last_watched_at").map_err(ser)?;
    let completed_at: Option<DateTime<Utc>> = row.try_get("completed_at").map_err(ser)?;

    LessonProgress::from_persisted(
        id_from_row::<LessonProgressId>(row, "id")?,
        id_from_row::<UserId>(row, "user_id")?,
        id_from_row::<LessonId>(row, "lesson_id")?,
        row.try_get("progress").map_err(ser)?,
        is_completed != 0,
        last_watched_at,
        completed_at,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

/// Expects the progress columns plus the joined `lesson_title`,
/// `content_type`, `module_title` and `course_title`.
pub(crate) fn map_activity_row(row: &SqliteRow) -> Result<LessonActivity, StorageError> {
    Ok(LessonActivity {
        progress: map_progress_row(row)?,
        lesson_title: row.try_get("lesson_title").map_err(ser)?,
        content_type: row.try_get("content_type").map_err(ser)?,
        module_title: row.try_get("module_title").map_err(ser)?,
        course_title: row.try_get("course_title").map_err(ser)?,
    })
}
