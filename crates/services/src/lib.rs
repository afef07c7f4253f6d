#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod lesson_progress_service;
pub mod progress_service;

pub use learnify_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use error::{AppServicesError, CatalogError, LessonProgressError, ProgressServiceError};
pub use lesson_progress_service::LessonProgressService;
pub use progress_service::{ProgressService, RECENT_ACTIVITY_LIMIT};
