use axum::extract::State;
use axum::http::StatusCode;

use crate::api::extract::{Json, Path, Query};
use crate::db::{self, enrollments, students};
use crate::error::{AppError, ErrorResponse};
use crate::models::{
    Course, Message, NameSearchParams, NewStudentRequest, Student, StudentQueryParams,
    UpdateStudentRequest,
};
use crate::state::AppState;

/// Create a student
#[utoipa::path(
    post,
    path = "/students",
    request_body = NewStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 409, description = "national_id already in use", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = students::insert_student(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// List students with optional filters
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Page of students", body = Vec<Student>),
        (status = 422, description = "Invalid pagination", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = students::fetch_students(&state.db, &params).await?;
    Ok(Json(students))
}

/// List soft-deleted students
#[utoipa::path(
    get,
    path = "/students/deleted",
    responses((status = 200, description = "Deleted students", body = Vec<Student>)),
    tag = "Students"
)]
pub async fn list_deleted_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = db::list_deleted::<Student>(&state.db).await?;
    Ok(Json(students))
}

/// Search students by name
///
/// Matching ignores case for ASCII letters only: `MARÍA` does not match `María`.
#[utoipa::path(
    get,
    path = "/students/search",
    params(NameSearchParams),
    responses(
        (status = 200, description = "Matching students", body = Vec<Student>),
        (status = 404, description = "No student matches", body = ErrorResponse),
        (status = 422, description = "Missing or blank name", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = students::search_students(&state.db, &params.name).await?;
    Ok(Json(students))
}

/// Get a student by id
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student missing or deleted", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Student>, AppError> {
    let student = db::get_by_id::<Student>(&state.db, id).await?;
    Ok(Json(student))
}

/// Update the fields present in the body
#[utoipa::path(
    patch,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student missing or deleted", body = ErrorResponse),
        (status = 409, description = "national_id already in use", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = students::update_student(&state.db, id, req).await?;
    Ok(Json(student))
}

/// Soft-delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = Message),
        (status = 400, description = "Student already deleted", body = ErrorResponse),
        (status = 404, description = "Student missing", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::soft_delete::<Student>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Student {} deleted", id))))
}

/// Restore a soft-deleted student
#[utoipa::path(
    patch,
    path = "/students/{id}/restore",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student restored", body = Message),
        (status = 400, description = "Student is not deleted", body = ErrorResponse),
        (status = 404, description = "Student missing", body = ErrorResponse)
    ),
    tag = "Students"
)]
pub async fn restore_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::restore::<Student>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Student {} restored", id))))
}

/// Courses the student is enrolled in
#[utoipa::path(
    get,
    path = "/students/{id}/courses",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Enrolled courses", body = Vec<Course>),
        (status = 404, description = "Student missing or deleted", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn student_courses(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = enrollments::courses_of_student(&state.db, id).await?;
    Ok(Json(courses))
}
