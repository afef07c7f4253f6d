mod course;
mod ids;
mod progress;
mod summary;

pub use ids::{CourseId, LessonId, LessonProgressId, ModuleId, ParseIdError, UserId};

pub use course::{Course, CourseError, Lesson, Module};
pub use progress::{LessonActivity, LessonProgress, ProgressError, ProgressUpdate};
pub use summary::{ActivityEntry, ActivityStatus, CourseProgressSummary, SummaryError};
