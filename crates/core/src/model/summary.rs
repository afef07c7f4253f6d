use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::LessonProgressId;
use crate::model::progress::LessonActivity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed lessons ({completed}) exceed total lessons ({total})")]
    CompletedExceedsTotal { completed: u32, total: u32 },
}

//
// ─── COURSE PROGRESS ───────────────────────────────────────────────────────────
//

/// A learner's completion of one course, computed on read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseProgressSummary {
    progress_percent: f64,
    completed_lessons: u32,
    total_lessons: u32,
}

/// Rounds half away from zero to one decimal place.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl CourseProgressSummary {
    /// Summary for a course without lessons.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            progress_percent: 0.0,
            completed_lessons: 0,
            total_lessons: 0,
        }
    }

    /// Builds the summary from lesson counts.
    ///
    /// A course without lessons reports all zeros instead of dividing.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::CompletedExceedsTotal` if `completed > total`.
    pub fn from_counts(completed: u32, total: u32) -> Result<Self, SummaryError> {
        if completed > total {
            return Err(SummaryError::CompletedExceedsTotal { completed, total });
        }
        if total == 0 {
            return Ok(Self::empty());
        }

        let ratio = f64::from(completed) / f64::from(total);
        Ok(Self {
            progress_percent: round_one_decimal(ratio * 100.0),
            completed_lessons: completed,
            total_lessons: total,
        })
    }

    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    #[must_use]
    pub fn completed_lessons(&self) -> u32 {
        self.completed_lessons
    }

    #[must_use]
    pub fn total_lessons(&self) -> u32 {
        self.total_lessons
    }
}

//
// ─── ACTIVITY FEED ─────────────────────────────────────────────────────────────
//

/// Whether an activity entry reports a finished lesson or a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Completed,
    Viewed,
}

impl ActivityStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Viewed => "Viewed",
        }
    }
}

const DEFAULT_CONTENT_LABEL: &str = "Lesson";
const DEFAULT_LESSON_TITLE: &str = "Untitled Lesson";
const DEFAULT_COURSE_TITLE: &str = "Course";

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// One line of a learner's recent-activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: LessonProgressId,
    pub kind: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Reserved; always `None` today.
    pub details: Option<String>,
}

impl ActivityEntry {
    #[must_use]
    pub fn from_activity(activity: &LessonActivity) -> Self {
        let progress = &activity.progress;
        let status = if progress.is_completed() {
            ActivityStatus::Completed
        } else {
            ActivityStatus::Viewed
        };
        let label = capitalize(
            present(activity.content_type.as_deref()).unwrap_or(DEFAULT_CONTENT_LABEL),
        );
        let lesson = present(activity.lesson_title.as_deref()).unwrap_or(DEFAULT_LESSON_TITLE);
        let course = present(activity.course_title.as_deref()).unwrap_or(DEFAULT_COURSE_TITLE);

        Self {
            id: progress.id(),
            kind: format!("{label} {}", status.as_str()),
            name: format!("{lesson} • {course}"),
            created_at: progress.event_time(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LessonId, LessonProgress, ProgressUpdate, UserId};
    use crate::time::fixed_now;

    fn activity(content_type: Option<&str>, completed: bool) -> LessonActivity {
        let progress = LessonProgress::start(
            LessonProgressId::new_v4(),
            UserId::new_v4(),
            LessonId::new_v4(),
            ProgressUpdate::new(if completed { 1.0 } else { 0.4 }, completed).unwrap(),
            fixed_now(),
        );
        LessonActivity {
            progress,
            lesson_title: Some("Cardiac Cycle".into()),
            content_type: content_type.map(str::to_owned),
            module_title: Some("Physiology".into()),
            course_title: Some("Anatomy 101".into()),
        }
    }

    #[test]
    fn empty_course_reports_zeros() {
        let summary = CourseProgressSummary::from_counts(0, 0).unwrap();
        assert_eq!(summary, CourseProgressSummary::empty());
        assert_eq!(summary.progress_percent(), 0.0);
    }

    #[test]
    fn half_complete_course() {
        let summary = CourseProgressSummary::from_counts(2, 4).unwrap();
        assert_eq!(summary.progress_percent(), 50.0);
        assert_eq!(summary.completed_lessons(), 2);
        assert_eq!(summary.total_lessons(), 4);
    }

    #[test]
    fn percent_is_rounded_to_one_decimal() {
        let percent = |completed, total| {
            CourseProgressSummary::from_counts(completed, total)
                .unwrap()
                .progress_percent()
        };
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(1, 7), 14.3);
        assert_eq!(percent(3, 3), 100.0);
    }

    #[test]
    fn completed_cannot_exceed_total() {
        assert_eq!(
            CourseProgressSummary::from_counts(5, 4).unwrap_err(),
            SummaryError::CompletedExceedsTotal {
                completed: 5,
                total: 4
            }
        );
    }

    #[test]
    fn capitalize_matches_title_rule() {
        assert_eq!(capitalize("video"), "Video");
        assert_eq!(capitalize("PDF"), "Pdf");
        assert_eq!(capitalize("interactive QUIZ"), "Interactive quiz");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn entry_labels_completed_video() {
        let entry = ActivityEntry::from_activity(&activity(Some("video"), true));
        assert_eq!(entry.kind, "Video Completed");
        assert_eq!(entry.name, "Cardiac Cycle • Anatomy 101");
        assert_eq!(entry.created_at, fixed_now());
        assert_eq!(entry.details, None);
    }

    #[test]
    fn entry_defaults_missing_labels() {
        let mut row = activity(None, false);
        row.lesson_title = None;
        row.course_title = Some(String::new());

        let entry = ActivityEntry::from_activity(&row);
        assert_eq!(entry.kind, "Lesson Viewed");
        assert_eq!(entry.name, "Untitled Lesson • Course");
    }

    #[test]
    fn entry_treats_empty_content_type_as_missing() {
        let entry = ActivityEntry::from_activity(&activity(Some(""), false));
        assert_eq!(entry.kind, "Lesson Viewed");
    }
}
