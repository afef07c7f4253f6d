use async_trait::async_trait;
use learnify_core::model::{
    Course, CourseId, Lesson, LessonActivity, LessonId, LessonProgress, Module, ModuleId, UserId,
};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    /// A referenced parent row is missing or a unique key is already taken.
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for courses and their modules.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Persist or update a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing course is `Ok(None)`.
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError>;

    /// Persist or update a module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the owning course does not exist.
    async fn upsert_module(&self, module: &Module) -> Result<(), StorageError>;

    /// Fetch a module by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing module is `Ok(None)`.
    async fn get_module(&self, id: ModuleId) -> Result<Option<Module>, StorageError>;
}

/// Repository contract for lessons.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Persist or update a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the owning module does not exist.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing lesson is `Ok(None)`.
    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError>;

    /// Every lesson reachable from the course through its modules.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn lesson_ids_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<LessonId>, StorageError>;
}

/// Repository contract for per-learner lesson progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the learner's record for a lesson, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError>;

    /// Insert or update the record keyed by `(user_id, lesson_id)` and return
    /// what is stored afterwards.
    ///
    /// An existing row keeps its id and `created_at`. It is only overwritten
    /// when the incoming progress is higher or the completion flag differs,
    /// so racing writers cannot move progress backwards.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the lesson does not exist.
    async fn upsert_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, StorageError>;

    /// Count the learner's completed records among `lesson_ids`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn count_completed(
        &self,
        user_id: UserId,
        lesson_ids: &[LessonId],
    ) -> Result<u32, StorageError>;

    /// The learner's progress rows joined with lesson, module and course
    /// titles, most recent event first, at most `limit` rows.
    ///
    /// Event time is `completed_at`, else `last_watched_at`, else `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<LessonActivity>, StorageError>;
}

/// Applies the same overwrite rule as the SQL upsert.
pub(crate) fn should_overwrite(stored: &LessonProgress, incoming: &LessonProgress) -> bool {
    incoming.progress() > stored.progress() || incoming.is_completed() != stored.is_completed()
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    modules: Arc<Mutex<HashMap<ModuleId, Module>>>,
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
    progress: Arc<Mutex<HashMap<(UserId, LessonId), LessonProgress>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        lock(&self.courses)?.insert(course.id(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StorageError> {
        Ok(lock(&self.courses)?.get(&id).cloned())
    }

    async fn upsert_module(&self, module: &Module) -> Result<(), StorageError> {
        if !lock(&self.courses)?.contains_key(&module.course_id()) {
            return Err(StorageError::Conflict);
        }
        lock(&self.modules)?.insert(module.id(), module.clone());
        Ok(())
    }

    async fn get_module(&self, id: ModuleId) -> Result<Option<Module>, StorageError> {
        Ok(lock(&self.modules)?.get(&id).cloned())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        if !lock(&self.modules)?.contains_key(&lesson.module_id()) {
            return Err(StorageError::Conflict);
        }
        lock(&self.lessons)?.insert(lesson.id(), lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        Ok(lock(&self.lessons)?.get(&id).cloned())
    }

    async fn lesson_ids_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<LessonId>, StorageError> {
        let module_ids: HashSet<ModuleId> = lock(&self.modules)?
            .values()
            .filter(|m| m.course_id() == course_id)
            .map(Module::id)
            .collect();

        let lessons = lock(&self.lessons)?;
        let mut ids: Vec<LessonId> = lessons
            .values()
            .filter(|l| module_ids.contains(&l.module_id()))
            .map(Lesson::id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<LessonProgress>, StorageError> {
        Ok(lock(&self.progress)?.get(&(user_id, lesson_id)).cloned())
    }

    async fn upsert_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, StorageError> {
        if !lock(&self.lessons)?.contains_key(&progress.lesson_id()) {
            return Err(StorageError::Conflict);
        }

        let mut guard = lock(&self.progress)?;
        let key = (progress.user_id(), progress.lesson_id());
        let stored = match guard.get(&key) {
            None => progress.clone(),
            Some(existing) if !should_overwrite(existing, progress) => existing.clone(),
            Some(existing) => LessonProgress::from_persisted(
                existing.id(),
                existing.user_id(),
                existing.lesson_id(),
                progress.progress(),
                progress.is_completed(),
                progress.last_watched_at(),
                progress.completed_at(),
                existing.created_at(),
                progress.updated_at(),
            )
            .map_err(|e| StorageError::Serialization(e.to_string()))?,
        };
        guard.insert(key, stored.clone());
        Ok(stored)
    }

    async fn count_completed(
        &self,
        user_id: UserId,
        lesson_ids: &[LessonId],
    ) -> Result<u32, StorageError> {
        let wanted: HashSet<&LessonId> = lesson_ids.iter().collect();
        let count = lock(&self.progress)?
            .values()
            .filter(|p| {
                p.user_id() == user_id && p.is_completed() && wanted.contains(&p.lesson_id())
            })
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }

    async fn recent_activity(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<LessonActivity>, StorageError> {
        let courses = lock(&self.courses)?;
        let modules = lock(&self.modules)?;
        let lessons = lock(&self.lessons)?;
        let progress = lock(&self.progress)?;

        // Inner-join semantics: rows whose hierarchy is incomplete are skipped.
        let mut rows: Vec<LessonActivity> = progress
            .values()
            .filter(|p| p.user_id() == user_id)
            .filter_map(|p| {
                let lesson = lessons.get(&p.lesson_id())?;
                let module = modules.get(&lesson.module_id())?;
                let course = courses.get(&module.course_id())?;
                Some(LessonActivity {
                    progress: p.clone(),
                    lesson_title: lesson.title().map(str::to_owned),
                    content_type: lesson.content_type().map(str::to_owned),
                    module_title: module.title().map(str::to_owned),
                    course_title: Some(course.title().to_owned()),
                })
            })
            .collect();

        rows.sort_by_key(|row| {
            let p = &row.progress;
            Reverse((p.event_time(), p.created_at(), p.id()))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            courses,
            lessons,
            progress,
        }
    }
}
