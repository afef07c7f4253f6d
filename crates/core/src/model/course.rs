use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("sequence order must be >= 0, got {0}")]
    NegativeSequenceOrder(i32),
}

/// Blank strings are stored as missing.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn check_order(order: Option<i32>) -> Result<Option<i32>, CourseError> {
    match order {
        Some(n) if n < 0 => Err(CourseError::NegativeSequenceOrder(n)),
        other => Ok(other),
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Top of the catalogue hierarchy: a course owns ordered modules.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course with a validated title.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: title.to_owned(),
            description: non_blank(description),
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// A course section. `sequence_order` only affects display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    id: ModuleId,
    course_id: CourseId,
    title: Option<String>,
    sequence_order: Option<i32>,
    created_at: DateTime<Utc>,
}

impl Module {
    /// # Errors
    ///
    /// Returns `CourseError::NegativeSequenceOrder` for a negative order.
    pub fn new(
        id: ModuleId,
        course_id: CourseId,
        title: Option<String>,
        sequence_order: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        Ok(Self {
            id,
            course_id,
            title: non_blank(title),
            sequence_order: check_order(sequence_order)?,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn sequence_order(&self) -> Option<i32> {
        self.sequence_order
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single piece of course content.
///
/// `content_type` is a free-form tag (`video`, `pdf`, `quiz`, ...) kept as the
/// author typed it; activity labels normalise its casing on read.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    module_id: ModuleId,
    title: Option<String>,
    content_type: Option<String>,
    sequence_order: Option<i32>,
    created_at: DateTime<Utc>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `CourseError::NegativeSequenceOrder` for a negative order.
    pub fn new(
        id: LessonId,
        module_id: ModuleId,
        title: Option<String>,
        content_type: Option<String>,
        sequence_order: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        Ok(Self {
            id,
            module_id,
            title: non_blank(title),
            content_type: non_blank(content_type),
            sequence_order: check_order(sequence_order)?,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn sequence_order(&self) -> Option<i32> {
        self.sequence_order
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn course_title_is_trimmed() {
        let course = Course::new(CourseId::new_v4(), "  Anatomy 101 ", None, fixed_now()).unwrap();
        assert_eq!(course.title(), "Anatomy 101");
    }

    #[test]
    fn blank_course_title_is_rejected() {
        let err = Course::new(CourseId::new_v4(), "   ", None, fixed_now()).unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn lesson_blank_fields_become_none() {
        let lesson = Lesson::new(
            LessonId::new_v4(),
            ModuleId::new_v4(),
            Some(String::new()),
            Some("  ".into()),
            Some(1),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(lesson.title(), None);
        assert_eq!(lesson.content_type(), None);
    }

    #[test]
    fn negative_module_order_is_rejected() {
        let err = Module::new(
            ModuleId::new_v4(),
            CourseId::new_v4(),
            Some("Intro".into()),
            Some(-1),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, CourseError::NegativeSequenceOrder(-1));
    }
}
