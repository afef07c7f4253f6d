use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use learnify_core::model::{
    Course, CourseId, Lesson, LessonId, LessonProgress, LessonProgressId, Module, ModuleId,
    ProgressUpdate, UserId,
};
use storage::repository::Storage;

const CONTENT_TYPES: [&str; 3] = ["video", "quiz", "reading"];

/// Seed a demo course and, optionally, one learner's progress through it.
#[derive(Debug, Clone, Parser)]
#[command(name = "seed")]
struct Args {
    /// `SQLite` URL to seed.
    #[arg(
        long = "db",
        env = "LEARNIFY_DB_URL",
        default_value = "sqlite://learnify.sqlite3?mode=rwc"
    )]
    db_url: String,

    /// Course title.
    #[arg(long, env = "LEARNIFY_COURSE_TITLE", default_value = "Clinical Anatomy")]
    course_title: String,

    /// Number of modules to create.
    #[arg(long, default_value_t = 2)]
    modules: u32,

    /// Lessons per module.
    #[arg(long, default_value_t = 3)]
    lessons: u32,

    /// Learner to record progress for.
    #[arg(long, env = "LEARNIFY_SEED_USER")]
    user: Option<UserId>,

    /// How many lessons the learner has completed, in catalogue order.
    #[arg(long, default_value_t = 2)]
    completed: u32,

    /// Fixed current time (RFC 3339) for deterministic seeding.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

async fn seed_catalogue(
    storage: &Storage,
    args: &Args,
    now: DateTime<Utc>,
) -> anyhow::Result<(CourseId, Vec<LessonId>)> {
    let course = Course::new(CourseId::new_v4(), args.course_title.clone(), None, now)?;
    storage.courses.upsert_course(&course).await?;

    let mut lesson_ids = Vec::new();
    for m in 0..args.modules {
        let order = i32::try_from(m).context("module count too large")?;
        let module = Module::new(
            ModuleId::new_v4(),
            course.id(),
            Some(format!("Module {}", m + 1)),
            Some(order),
            now,
        )?;
        storage.courses.upsert_module(&module).await?;

        for l in 0..args.lessons {
            let order = i32::try_from(l).context("lesson count too large")?;
            let content_type = CONTENT_TYPES[l as usize % CONTENT_TYPES.len()];
            let lesson = Lesson::new(
                LessonId::new_v4(),
                module.id(),
                Some(format!("Lesson {}.{}", m + 1, l + 1)),
                Some(content_type.to_owned()),
                Some(order),
                now,
            )?;
            storage.lessons.upsert_lesson(&lesson).await?;
            lesson_ids.push(lesson.id());
        }
    }

    Ok((course.id(), lesson_ids))
}

async fn seed_progress(
    storage: &Storage,
    user: UserId,
    lesson_ids: &[LessonId],
    completed: u32,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let completed = completed as usize;
    let mut written = 0;
    // Completed lessons first, then one lesson in progress.
    for (i, lesson_id) in lesson_ids.iter().take(completed + 1).enumerate() {
        let done = i < completed;
        let update = ProgressUpdate::new(if done { 1.0 } else { 0.4 }, done)?;
        let minutes = i64::try_from(lesson_ids.len() - i).context("too many lessons")?;
        let at = now - Duration::minutes(minutes * 15);
        let record =
            LessonProgress::start(LessonProgressId::new_v4(), user, *lesson_id, update, at);
        storage.progress.upsert_progress(&record).await?;
        written += 1;
    }
    Ok(written)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let storage = Storage::sqlite(&args.db_url)
        .await
        .with_context(|| format!("opening {}", args.db_url))?;
    let now = args.now.unwrap_or_else(Utc::now);

    let (course_id, lesson_ids) = seed_catalogue(&storage, &args, now).await?;
    println!(
        "Seeded course {course_id} with {} lessons into {}",
        lesson_ids.len(),
        args.db_url
    );

    if let Some(user) = args.user {
        let written = seed_progress(&storage, user, &lesson_ids, args.completed, now).await?;
        println!("Recorded {written} progress rows for user {user}");
    }

    Ok(())
}
