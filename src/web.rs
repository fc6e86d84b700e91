//! The JSON-over-HTTP surface.
//!
//! Request bodies are decoded into structs whose fields are all optional, then checked here, so a
//! missing field becomes a validation error rather than a framework rejection. Store work runs on
//! the blocking pool.

use crate::error::{Error, Result};
use crate::models::parse_date;
use crate::registry::EntityRegistry;
use crate::relationships::RelationshipManager;
use crate::reports::{EventPopularity, EventSummary, ReportEngine, StudentParticipation, TopStudent};
use crate::store::Store;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    registry: EntityRegistry,
    relationships: RelationshipManager,
    reports: ReportEngine,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            registry: EntityRegistry::new(store.clone()),
            relationships: RelationshipManager::new(store.clone()),
            reports: ReportEngine::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/colleges", post(create_college))
        .route("/students", post(create_student))
        .route("/events", post(create_event))
        .route("/register", post(register_student))
        .route("/attendance", post(mark_attendance))
        .route("/feedback", post(submit_feedback))
        .route("/reports/event-popularity", get(event_popularity))
        .route("/reports/student/:student_id", get(student_participation))
        .route("/reports/top-students", get(top_students))
        .route("/reports/filter", get(filter_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `bind` until the process is stopped.
pub async fn serve(store: Store, bind: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "listening");
    axum::serve(listener, router(AppState::new(store))).await
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            warn!(kind = self.kind(), "rejected request: {self}");
            let body = json!({ "error": self.to_string(), "kind": self.kind() });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        } else {
            error!("request failed: {self}");
            let body = json!({ "error": "Internal server error", "kind": self.kind() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

/// Runs blocking store work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

fn field<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| Error::missing(name))
}

#[derive(Deserialize)]
struct CreateCollege {
    name: Option<String>,
}

#[derive(Deserialize)]
struct CreateStudent {
    name: Option<String>,
    email: Option<String>,
    college_id: Option<i32>,
}

#[derive(Deserialize)]
struct CreateEvent {
    title: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    date: Option<String>,
    college_id: Option<i32>,
}

#[derive(Deserialize)]
struct RegisterStudent {
    student_id: Option<i32>,
    event_id: Option<i32>,
}

#[derive(Deserialize)]
struct MarkAttendance {
    student_id: Option<i32>,
    event_id: Option<i32>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct SubmitFeedback {
    student_id: Option<i32>,
    event_id: Option<i32>,
    rating: Option<i64>,
}

#[derive(Deserialize)]
struct FilterQuery {
    #[serde(rename = "type")]
    event_type: Option<String>,
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "Campus Event Reporting System API is running" }))
}

async fn create_college(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCollege>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let name = field(body.name, "name")?;

    let college = blocking(move || state.registry.create_college(&name)).await?;

    Ok(Json(json!({ "id": college.id, "name": college.name })))
}

async fn create_student(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateStudent>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let name = field(body.name, "name")?;
    let email = field(body.email, "email")?;
    let college_id = field(body.college_id, "college_id")?;

    let student =
        blocking(move || state.registry.create_student(&name, &email, college_id)).await?;

    Ok(Json(json!({ "id": student.id, "name": student.name })))
}

async fn create_event(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateEvent>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let title = field(body.title, "title")?;
    let event_type = field(body.event_type, "type")?;
    let date = parse_date(&field(body.date, "date")?)?;
    let college_id = field(body.college_id, "college_id")?;

    let event = blocking(move || {
        state
            .registry
            .create_event(&title, &event_type, date, college_id)
    })
    .await?;

    Ok(Json(json!({ "message": "Event created", "event_id": event.id })))
}

async fn register_student(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterStudent>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let student_id = field(body.student_id, "student_id")?;
    let event_id = field(body.event_id, "event_id")?;

    blocking(move || state.relationships.register_student(student_id, event_id)).await?;

    Ok(Json(json!({ "message": "Student registered" })))
}

async fn mark_attendance(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MarkAttendance>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let student_id = field(body.student_id, "student_id")?;
    let event_id = field(body.event_id, "event_id")?;
    let status = field(body.status, "status")?;

    blocking(move || {
        state
            .relationships
            .mark_attendance(student_id, event_id, &status)
    })
    .await?;

    Ok(Json(json!({ "message": "Attendance marked" })))
}

async fn submit_feedback(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SubmitFeedback>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let student_id = field(body.student_id, "student_id")?;
    let event_id = field(body.event_id, "event_id")?;
    let rating = field(body.rating, "rating")?;

    blocking(move || {
        state
            .relationships
            .submit_feedback(student_id, event_id, rating)
    })
    .await?;

    Ok(Json(json!({ "message": "Feedback submitted" })))
}

async fn event_popularity(State(state): State<AppState>) -> Result<Json<Vec<EventPopularity>>> {
    let rows = blocking(move || state.reports.event_popularity()).await?;
    Ok(Json(rows))
}

async fn student_participation(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<StudentParticipation>> {
    let Path(student_id) = path?;
    let report = blocking(move || state.reports.student_participation(student_id)).await?;
    Ok(Json(report))
}

async fn top_students(State(state): State<AppState>) -> Result<Json<Vec<TopStudent>>> {
    let rows = blocking(move || state.reports.top_students()).await?;
    Ok(Json(rows))
}

async fn filter_events(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<EventSummary>>> {
    let rows = blocking(move || state.reports.filter_by_type(query.event_type.as_deref())).await?;
    Ok(Json(rows))
}
