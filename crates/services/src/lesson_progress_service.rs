use std::sync::Arc;

use learnify_core::model::{LessonId, LessonProgress, LessonProgressId, ProgressUpdate, UserId};
use storage::repository::{LessonRepository, ProgressRepository};

use crate::Clock;
use crate::error::LessonProgressError;

/// Reads and records a learner's progress through individual lessons.
#[derive(Clone)]
pub struct LessonProgressService {
    clock: Clock,
    lessons: Arc<dyn LessonRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl LessonProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        lessons: Arc<dyn LessonRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            lessons,
            progress,
        }
    }

    /// The learner's record for a lesson.
    ///
    /// Learners who never opened the lesson get an unsaved zero record.
    ///
    /// # Errors
    ///
    /// Returns `LessonProgressError::Storage` if repository access fails.
    pub async fn lesson_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<LessonProgress, LessonProgressError> {
        let stored = self.progress.get_progress(user_id, lesson_id).await?;
        Ok(stored
            .unwrap_or_else(|| LessonProgress::not_started(user_id, lesson_id, self.clock.now())))
    }

    /// Record a progress report from the client.
    ///
    /// Reports that neither raise progress nor flip completion leave the
    /// stored record untouched. Returns the record as stored afterwards.
    ///
    /// # Errors
    ///
    /// Returns `LessonProgressError::Progress` if the fraction is outside [0, 1].
    /// Returns `LessonProgressError::LessonNotFound` if the lesson does not exist.
    /// Returns `LessonProgressError::Storage` if repository access fails.
    pub async fn record(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        progress: f64,
        is_completed: bool,
    ) -> Result<LessonProgress, LessonProgressError> {
        let update = ProgressUpdate::new(progress, is_completed)?;

        if self.lessons.get_lesson(lesson_id).await?.is_none() {
            return Err(LessonProgressError::LessonNotFound(lesson_id));
        }

        let now = self.clock.now();
        let candidate = match self.progress.get_progress(user_id, lesson_id).await? {
            Some(mut existing) => {
                if !existing.apply(update, now) {
                    tracing::debug!(%user_id, %lesson_id, "progress report ignored");
                    return Ok(existing);
                }
                existing
            }
            None => LessonProgress::start(
                LessonProgressId::new_v4(),
                user_id,
                lesson_id,
                update,
                now,
            ),
        };

        // The store re-checks the guard, so a concurrent writer cannot be undone.
        let stored = self.progress.upsert_progress(&candidate).await?;
        tracing::info!(
            %user_id,
            %lesson_id,
            progress = stored.progress(),
            is_completed = stored.is_completed(),
            "lesson progress recorded"
        );
        Ok(stored)
    }
}
