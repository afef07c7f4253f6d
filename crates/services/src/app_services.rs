use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::lesson_progress_service::LessonProgressService;
use crate::progress_service::ProgressService;

/// Assembles the services over one storage backend.
///
/// Only `progress` is served over HTTP. The progress recorder and the
/// catalogue writers have no route; they are for callers that embed the
/// crate, such as fixture setup.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    lesson_progress: Arc<LessonProgressService>,
    catalog: Arc<CatalogService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an already-opened storage.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        ));
        let lesson_progress = Arc::new(LessonProgressService::new(
            clock,
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        ));
        let catalog = Arc::new(CatalogService::new(
            clock,
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
        ));

        Self {
            progress,
            lesson_progress,
            catalog,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    /// Writer for learner progress reports. Not routed over HTTP.
    #[must_use]
    pub fn lesson_progress(&self) -> Arc<LessonProgressService> {
        Arc::clone(&self.lesson_progress)
    }

    /// Writer for courses, modules and lessons. Not routed over HTTP.
    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }
}
