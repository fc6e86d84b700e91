use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use campus_events::Store;
use campus_events::web::{AppState, router};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tower::ServiceExt;

#[fixture]
fn app() -> Router {
    router(AppState::new(Store::in_memory().unwrap()))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

/// Creates a college, a student, and a workshop; returns `(student_id, event_id)`.
async fn seed(app: &Router) -> (i64, i64) {
    let (_, college) = post(app, "/colleges", json!({ "name": "North Campus" })).await;
    let college_id = college["id"].as_i64().unwrap();

    let (_, student) = post(
        app,
        "/students",
        json!({ "name": "Ada", "email": "ada@north.edu", "college_id": college_id }),
    )
    .await;

    let (_, event) = post(
        app,
        "/events",
        json!({ "title": "Rust 101", "type": "Workshop", "date": "2025-09-15", "college_id": college_id }),
    )
    .await;

    (student["id"].as_i64().unwrap(), event["event_id"].as_i64().unwrap())
}

#[rstest]
#[tokio::test]
async fn home_reports_running(app: Router) {
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Campus Event Reporting System API is running");
}

#[rstest]
#[tokio::test]
async fn creates_entities(app: Router) {
    let (status, college) = post(&app, "/colleges", json!({ "name": "North Campus" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(college["name"], "North Campus");

    let (status, student) = post(
        &app,
        "/students",
        json!({ "name": "Ada", "email": "ada@north.edu", "college_id": college["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(student["name"], "Ada");

    let (status, event) = post(
        &app,
        "/events",
        json!({ "title": "Rust 101", "type": "Workshop", "date": "2025-09-15", "college_id": college["id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["message"], "Event created");
    assert!(event["event_id"].is_i64());
}

#[rstest]
#[tokio::test]
async fn missing_field_is_a_bad_request(app: Router) {
    let (status, body) = post(&app, "/colleges", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[rstest]
#[tokio::test]
async fn student_with_unknown_college_is_a_bad_request(app: Router) {
    let (status, body) = post(
        &app,
        "/students",
        json!({ "name": "Ada", "email": "ada@north.edu", "college_id": 9 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "reference");
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_is_reported(app: Router) {
    let (student_id, event_id) = seed(&app).await;
    let pair = json!({ "student_id": student_id, "event_id": event_id });

    let (status, body) = post(&app, "/register", pair.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student registered");

    let (status, body) = post(&app, "/register", pair).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duplicate registration");
}

#[rstest]
#[tokio::test]
async fn registration_for_unknown_event_is_not_a_duplicate(app: Router) {
    let (student_id, _) = seed(&app).await;

    let (status, body) = post(
        &app,
        "/register",
        json!({ "student_id": student_id, "event_id": 999 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "reference");
}

#[rstest]
#[tokio::test]
async fn invalid_status_and_rating_are_rejected(app: Router) {
    let (student_id, event_id) = seed(&app).await;

    let (status, body) = post(
        &app,
        "/attendance",
        json!({ "student_id": student_id, "event_id": event_id, "status": "Late" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, _) = post(
        &app,
        "/feedback",
        json!({ "student_id": student_id, "event_id": event_id, "rating": 6 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        &app,
        "/feedback",
        json!({ "student_id": student_id, "event_id": event_id, "rating": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Feedback submitted");
}

#[rstest]
#[tokio::test]
async fn reports_reflect_recorded_activity(app: Router) {
    let (student_id, event_id) = seed(&app).await;
    post(&app, "/register", json!({ "student_id": student_id, "event_id": event_id })).await;
    let (status, body) = post(
        &app,
        "/attendance",
        json!({ "student_id": student_id, "event_id": event_id, "status": "Present" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attendance marked");

    let (_, popularity) = get(&app, "/reports/event-popularity").await;
    assert_eq!(popularity, json!([{ "event": "Rust 101", "registrations": 1 }]));

    let (_, participation) = get(&app, &format!("/reports/student/{student_id}")).await;
    assert_eq!(
        participation,
        json!({ "student_id": student_id, "events_attended": ["Rust 101"] })
    );

    let (_, top) = get(&app, "/reports/top-students").await;
    assert_eq!(top, json!([{ "student": "Ada", "events_attended": 1 }]));

    let (_, filtered) = get(&app, "/reports/filter?type=workshop").await;
    assert_eq!(
        filtered,
        json!([{ "id": event_id, "title": "Rust 101", "date": "2025-09-15", "type": "Workshop" }])
    );
}

#[rstest]
#[case("/reports/student/abc")]
#[case("/reports/student/99999999999")]
#[tokio::test]
async fn malformed_student_id_is_a_json_bad_request(app: Router, #[case] uri: &str) {
    let (status, body) = get(&app, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].is_string());
}

#[rstest]
#[tokio::test]
async fn empty_reports_are_not_errors(app: Router) {
    let (status, body) = get(&app, "/reports/student/41").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "student_id": 41, "events_attended": [] }));

    let (status, body) = get(&app, "/reports/filter?type=seminar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/reports/filter").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
