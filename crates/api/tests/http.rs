use api::routes::{ActivityEntryResponse, CourseProgressResponse};
use api::{AppState, USER_ID_HEADER, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use learnify_core::model::{CourseId, UserId};
use learnify_core::time::fixed_now;
use serde_json::Value;
use services::{AppServices, Clock};
use storage::repository::Storage;
use tower::ServiceExt;

struct Fixture {
    app: Router,
    course_id: CourseId,
    user: UserId,
}

/// A four-lesson course where the learner finished two lessons and opened one.
async fn fixture() -> Fixture {
    let services = AppServices::from_storage(&Storage::in_memory(), Clock::fixed(fixed_now()));
    let catalog = services.catalog();
    let course = catalog.create_course("Anatomy", None).await.unwrap();
    let module = catalog
        .add_module(course.id(), Some("Heart".into()), Some(0))
        .await
        .unwrap();

    let mut lessons = Vec::new();
    for n in 0..4 {
        let lesson = catalog
            .add_lesson(
                module.id(),
                Some(format!("Lesson {n}")),
                Some("quiz".into()),
                Some(n),
            )
            .await
            .unwrap();
        lessons.push(lesson.id());
    }

    let user = UserId::new_v4();
    let recorder = services.lesson_progress();
    recorder.record(user, lessons[0], 1.0, true).await.unwrap();
    recorder.record(user, lessons[1], 1.0, true).await.unwrap();
    recorder.record(user, lessons[2], 0.3, false).await.unwrap();

    Fixture {
        app: router(AppState::new(&services)),
        course_id: course.id(),
        user,
    }
}

fn get(uri: &str, user: Option<UserId>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let fx = fixture().await;
    let response = fx.app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn course_progress_returns_summary() {
    let fx = fixture().await;
    let uri = format!("/api/v1/courses/{}/progress", fx.course_id);
    let response = fx.app.oneshot(get(&uri, Some(fx.user))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: CourseProgressResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(
        body,
        CourseProgressResponse {
            progress: 50.0,
            completed_lessons: 2,
            total_lessons: 4,
        }
    );
}

#[tokio::test]
async fn unknown_course_is_404_with_detail() {
    let fx = fixture().await;
    let uri = format!("/api/v1/courses/{}/progress", CourseId::new_v4());
    let response = fx.app.oneshot(get(&uri, Some(fx.user))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["detail"], "Course not found");
}

#[tokio::test]
async fn malformed_course_id_is_400() {
    let fx = fixture().await;
    let response = fx
        .app
        .oneshot(get("/api/v1/courses/not-a-uuid/progress", Some(fx.user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_or_invalid_identity_is_401() {
    let fx = fixture().await;

    let response = fx
        .app
        .clone()
        .oneshot(get("/api/v1/courses/recent-activity", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/courses/recent-activity")
        .header(USER_ID_HEADER, "nobody")
        .body(Body::empty())
        .unwrap();
    let response = fx.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recent_activity_lists_learner_events() {
    let fx = fixture().await;
    let response = fx
        .app
        .clone()
        .oneshot(get("/api/v1/courses/recent-activity", Some(fx.user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let raw = json_body(response).await;
    let first = &raw[0];
    assert!(first["details"].is_null());
    assert!(first.get("type").is_some());

    let entries: Vec<ActivityEntryResponse> = serde_json::from_value(raw).unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.name.ends_with(" • Anatomy")));
    assert_eq!(
        entries.iter().filter(|e| e.kind == "Quiz Completed").count(),
        2
    );
    assert_eq!(entries.iter().filter(|e| e.kind == "Quiz Viewed").count(), 1);

    // Another learner sees an empty feed.
    let response = fx
        .app
        .oneshot(get(
            "/api/v1/courses/recent-activity",
            Some(UserId::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, serde_json::json!([]));
}
