use axum::extract::State;
use axum::http::StatusCode;

use crate::api::extract::{Json, Path, Query};
use crate::db::enrollments;
use crate::error::{AppError, ErrorResponse};
use crate::models::{Enrollment, EnrollmentQueryParams, Message, NewEnrollmentRequest};
use crate::state::AppState;

/// Enroll a student in a course
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = NewEnrollmentRequest,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 404, description = "Student, course or period missing or deleted", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(req): Json<NewEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = enrollments::enroll(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/enrollments",
    params(EnrollmentQueryParams),
    responses((status = 200, description = "Enrollments", body = Vec<Enrollment>)),
    tag = "Enrollments"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<EnrollmentQueryParams>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = enrollments::fetch_enrollments(&state.db, params.period_id).await?;
    Ok(Json(enrollments))
}

/// Remove an enrollment
#[utoipa::path(
    delete,
    path = "/enrollments/{student_id}/{course_id}",
    params(
        ("student_id" = i64, Path, description = "Student id"),
        ("course_id" = i64, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Enrollment removed", body = Message),
        (status = 404, description = "No such enrollment", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<Message>, AppError> {
    enrollments::unenroll(&state.db, student_id, course_id).await?;
    Ok(Json(Message::new(format!(
        "Student {} unenrolled from course {}",
        student_id, course_id
    ))))
}
