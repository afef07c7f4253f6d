use std::sync::Arc;

use learnify_core::model::{Course, CourseId, Lesson, LessonId, Module, ModuleId};
use storage::repository::{CourseRepository, LessonRepository};

use crate::Clock;
use crate::error::CatalogError;

/// Authors the course, module and lesson hierarchy.
#[derive(Clone)]
pub struct CatalogService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            lessons,
        }
    }

    /// Create and persist a course.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Course` for validation failures.
    /// Returns `CatalogError::Storage` if persistence fails.
    pub async fn create_course(
        &self,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Course, CatalogError> {
        let course = Course::new(CourseId::new_v4(), title, description, self.clock.now())?;
        self.courses.upsert_course(&course).await?;
        tracing::info!(course_id = %course.id(), "course created");
        Ok(course)
    }

    /// Append a module to an existing course.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` if the course does not exist.
    /// Returns `CatalogError::Course` for validation failures.
    /// Returns `CatalogError::Storage` if persistence fails.
    pub async fn add_module(
        &self,
        course_id: CourseId,
        title: Option<String>,
        sequence_order: Option<i32>,
    ) -> Result<Module, CatalogError> {
        if self.courses.get_course(course_id).await?.is_none() {
            return Err(CatalogError::CourseNotFound(course_id));
        }
        let module = Module::new(
            ModuleId::new_v4(),
            course_id,
            title,
            sequence_order,
            self.clock.now(),
        )?;
        self.courses.upsert_module(&module).await?;
        Ok(module)
    }

    /// Append a lesson to an existing module.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ModuleNotFound` if the module does not exist.
    /// Returns `CatalogError::Course` for validation failures.
    /// Returns `CatalogError::Storage` if persistence fails.
    pub async fn add_lesson(
        &self,
        module_id: ModuleId,
        title: Option<String>,
        content_type: Option<String>,
        sequence_order: Option<i32>,
    ) -> Result<Lesson, CatalogError> {
        if self.courses.get_module(module_id).await?.is_none() {
            return Err(CatalogError::ModuleNotFound(module_id));
        }
        let lesson = Lesson::new(
            LessonId::new_v4(),
            module_id,
            title,
            content_type,
            sequence_order,
            self.clock.now(),
        )?;
        self.lessons.upsert_lesson(&lesson).await?;
        Ok(lesson)
    }

    /// Fetch a course by ID.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn get_course(&self, course_id: CourseId) -> Result<Option<Course>, CatalogError> {
        Ok(self.courses.get_course(course_id).await?)
    }
}
