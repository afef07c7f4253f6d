use std::sync::Arc;

use learnify_core::model::{ActivityEntry, CourseId, CourseProgressSummary, UserId};
use storage::repository::{
    CourseRepository, LessonRepository, ProgressRepository, StorageError,
};

use crate::error::ProgressServiceError;

/// Maximum number of entries returned by the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: u32 = 20;

/// Read-only aggregates over a learner's lesson progress.
#[derive(Clone)]
pub struct ProgressService {
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            courses,
            lessons,
            progress,
        }
    }

    /// Completion summary of one course for one learner.
    ///
    /// A course without lessons reports `0.0` with zero counts.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::CourseNotFound` if the course does not exist.
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn course_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<CourseProgressSummary, ProgressServiceError> {
        if self.courses.get_course(course_id).await?.is_none() {
            return Err(ProgressServiceError::CourseNotFound(course_id));
        }

        let lesson_ids = self.lessons.lesson_ids_for_course(course_id).await?;
        if lesson_ids.is_empty() {
            return Ok(CourseProgressSummary::empty());
        }

        let total = u32::try_from(lesson_ids.len())
            .map_err(|_| StorageError::Serialization("lesson count overflow".into()))?;
        let completed = self.progress.count_completed(user_id, &lesson_ids).await?;
        let summary = CourseProgressSummary::from_counts(completed, total)?;

        tracing::debug!(
            %user_id,
            %course_id,
            completed,
            total,
            progress = summary.progress_percent(),
            "computed course progress"
        );
        Ok(summary)
    }

    /// The learner's latest lesson events, newest first, capped at
    /// [`RECENT_ACTIVITY_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn recent_activity(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ActivityEntry>, ProgressServiceError> {
        let rows = self
            .progress
            .recent_activity(user_id, RECENT_ACTIVITY_LIMIT)
            .await?;
        Ok(rows.iter().map(ActivityEntry::from_activity).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnify_core::model::{
        Course, Lesson, LessonId, LessonProgress, LessonProgressId, Module, ModuleId,
        ProgressUpdate,
    };
    use learnify_core::time::fixed_now;
    use storage::repository::Storage;

    fn service(storage: &Storage) -> ProgressService {
        ProgressService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        )
    }

    async fn course_with_lessons(storage: &Storage, count: i32) -> (CourseId, Vec<LessonId>) {
        let course = Course::new(CourseId::new_v4(), "Cardiology", None, fixed_now()).unwrap();
        storage.courses.upsert_course(&course).await.unwrap();
        let module =
            Module::new(ModuleId::new_v4(), course.id(), None, Some(0), fixed_now()).unwrap();
        storage.courses.upsert_module(&module).await.unwrap();

        let mut ids = Vec::new();
        for n in 0..count {
            let lesson = Lesson::new(
                LessonId::new_v4(),
                module.id(),
                Some(format!("Lesson {n}")),
                None,
                Some(n),
                fixed_now(),
            )
            .unwrap();
            storage.lessons.upsert_lesson(&lesson).await.unwrap();
            ids.push(lesson.id());
        }
        (course.id(), ids)
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let storage = Storage::in_memory();
        let missing = CourseId::new_v4();
        let err = service(&storage)
            .course_progress(UserId::new_v4(), missing)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::CourseNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn course_without_lessons_is_empty() {
        let storage = Storage::in_memory();
        let (course_id, _) = course_with_lessons(&storage, 0).await;
        let summary = service(&storage)
            .course_progress(UserId::new_v4(), course_id)
            .await
            .unwrap();
        assert_eq!(summary, CourseProgressSummary::empty());
    }

    #[tokio::test]
    async fn one_of_three_rounds_to_one_decimal() {
        let storage = Storage::in_memory();
        let (course_id, lessons) = course_with_lessons(&storage, 3).await;
        let user = UserId::new_v4();
        let done = LessonProgress::start(
            LessonProgressId::new_v4(),
            user,
            lessons[0],
            ProgressUpdate::new(1.0, true).unwrap(),
            fixed_now(),
        );
        storage.progress.upsert_progress(&done).await.unwrap();

        let summary = service(&storage)
            .course_progress(user, course_id)
            .await
            .unwrap();
        assert_eq!(summary.progress_percent(), 33.3);
        assert_eq!(summary.completed_lessons(), 1);
        assert_eq!(summary.total_lessons(), 3);
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        struct Broken;

        #[async_trait::async_trait]
        impl CourseRepository for Broken {
            async fn upsert_course(&self, _: &Course) -> Result<(), StorageError> {
                Err(StorageError::Connection("down".into()))
            }
            async fn get_course(&self, _: CourseId) -> Result<Option<Course>, StorageError> {
                Err(StorageError::Connection("down".into()))
            }
            async fn upsert_module(&self, _: &Module) -> Result<(), StorageError> {
                Err(StorageError::Connection("down".into()))
            }
            async fn get_module(&self, _: ModuleId) -> Result<Option<Module>, StorageError> {
                Err(StorageError::Connection("down".into()))
            }
        }

        let storage = Storage::in_memory();
        let service = ProgressService::new(
            Arc::new(Broken),
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        );
        let err = service
            .course_progress(UserId::new_v4(), CourseId::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Storage(StorageError::Connection(_))
        ));
    }
}
