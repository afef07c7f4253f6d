use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{LessonId, LessonProgressId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress must be a fraction in [0, 1], got {0}")]
    OutOfRange(f64),
}

fn check_fraction(progress: f64) -> Result<f64, ProgressError> {
    if progress.is_finite() && (0.0..=1.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(ProgressError::OutOfRange(progress))
    }
}

//
// ─── UPDATE ────────────────────────────────────────────────────────────────────
//

/// A learner's watch/view event as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    progress: f64,
    is_completed: bool,
}

impl ProgressUpdate {
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` if `progress` is not a finite
    /// fraction between 0 and 1.
    pub fn new(progress: f64, is_completed: bool) -> Result<Self, ProgressError> {
        Ok(Self {
            progress: check_fraction(progress)?,
            is_completed,
        })
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }
}

//
// ─── LESSON PROGRESS ───────────────────────────────────────────────────────────
//

/// One learner's progress through one lesson.
///
/// At most one record exists per (user, lesson); storage enforces it with a
/// composite unique key.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonProgress {
    id: LessonProgressId,
    user_id: UserId,
    lesson_id: LessonId,
    progress: f64,
    is_completed: bool,
    last_watched_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    /// Creates the record for a learner's first interaction with a lesson.
    #[must_use]
    pub fn start(
        id: LessonProgressId,
        user_id: UserId,
        lesson_id: LessonId,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            lesson_id,
            progress: update.progress,
            is_completed: update.is_completed,
            last_watched_at: Some(now),
            completed_at: update.is_completed.then_some(now),
            created_at: now,
            updated_at: None,
        }
    }

    /// Placeholder returned to learners who have not opened the lesson yet.
    ///
    /// Never persisted.
    #[must_use]
    pub fn not_started(user_id: UserId, lesson_id: LessonId, now: DateTime<Utc>) -> Self {
        Self {
            id: LessonProgressId::new_v4(),
            user_id,
            lesson_id,
            progress: 0.0,
            is_completed: false,
            last_watched_at: None,
            completed_at: None,
            created_at: now,
            updated_at: None,
        }
    }

    /// Rehydrate a progress record from storage.
    ///
    /// Stored rows are taken as they are: a `completed_at` left behind on a
    /// record that is no longer completed still drives `event_time`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` for a stored fraction outside [0, 1].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: LessonProgressId,
        user_id: UserId,
        lesson_id: LessonId,
        progress: f64,
        is_completed: bool,
        last_watched_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ProgressError> {
        Ok(Self {
            id,
            user_id,
            lesson_id,
            progress: check_fraction(progress)?,
            is_completed,
            last_watched_at,
            completed_at,
            created_at,
            updated_at,
        })
    }

    /// Applies a client update, guarding against regressions.
    ///
    /// The record only changes when the reported progress is strictly higher
    /// than the stored one or the completion flag flips. Returns `true` if
    /// anything changed.
    pub fn apply(&mut self, update: ProgressUpdate, now: DateTime<Utc>) -> bool {
        let advanced = update.progress > self.progress;
        let flipped = update.is_completed != self.is_completed;
        if !advanced && !flipped {
            return false;
        }

        self.progress = update.progress;
        self.is_completed = update.is_completed;
        self.last_watched_at = Some(now);
        self.completed_at = update.is_completed.then_some(now);
        self.updated_at = Some(now);
        true
    }

    /// The most meaningful timestamp for this record.
    ///
    /// Fixed priority: completion, then last watch, then creation.
    #[must_use]
    pub fn event_time(&self) -> DateTime<Utc> {
        self.completed_at
            .or(self.last_watched_at)
            .unwrap_or(self.created_at)
    }

    #[must_use]
    pub fn id(&self) -> LessonProgressId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub fn last_watched_at(&self) -> Option<DateTime<Utc>> {
        self.last_watched_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

//
// ─── ACTIVITY ROW ──────────────────────────────────────────────────────────────
//

/// A progress record joined with the titles of the lesson, module and course
/// it belongs to. Storage produces these; the activity feed formats them.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonActivity {
    pub progress: LessonProgress,
    pub lesson_title: Option<String>,
    pub content_type: Option<String>,
    pub module_title: Option<String>,
    pub course_title: Option<String>,
}
