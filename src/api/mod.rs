pub mod courses;
pub mod doc;
pub mod enrollments;
pub mod extract;
pub mod periods;
pub mod students;

use axum::Json;
use axum::routing::{delete, patch};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::error::AppError;
use crate::state::AppState;

use self::doc::ApiDoc;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(OPENAPI_PATH, get(openapi))
        .route("/students", get(students::list_students).post(students::create_student))
        .route("/students/deleted", get(students::list_deleted_students))
        .route("/students/search", get(students::search_students))
        .route(
            "/students/{id}",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/{id}/restore", patch(students::restore_student))
        .route("/students/{id}/courses", get(students::student_courses))
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route("/courses/deleted", get(courses::list_deleted_courses))
        .route("/courses/search", get(courses::search_courses))
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/courses/{id}/restore", patch(courses::restore_course))
        .route("/courses/{id}/students", get(courses::course_students))
        .route("/periods", get(periods::list_periods).post(periods::create_period))
        .route("/periods/deleted", get(periods::list_deleted_periods))
        .route(
            "/periods/{id}",
            get(periods::get_period)
                .patch(periods::update_period)
                .delete(periods::delete_period),
        )
        .route("/periods/{id}/restore", patch(periods::restore_period))
        .route("/periods/{id}/activate", patch(periods::activate_period))
        .route(
            "/enrollments",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route(
            "/enrollments/{student_id}/{course_id}",
            delete(enrollments::delete_enrollment),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "docs": OPENAPI_PATH,
        "endpoints": ["/students", "/courses", "/periods", "/enrollments"],
    }))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}
