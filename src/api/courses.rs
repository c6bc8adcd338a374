use axum::extract::State;
use axum::http::StatusCode;

use crate::api::extract::{Json, Path, Query};
use crate::db::{self, courses, enrollments};
use crate::error::{AppError, ErrorResponse};
use crate::models::{
    Course, CourseQueryParams, Message, NameSearchParams, NewCourseRequest, Student,
    UpdateCourseRequest,
};
use crate::state::AppState;

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    request_body = NewCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = courses::insert_course(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// List courses with optional filters
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Page of courses", body = Vec<Course>),
        (status = 422, description = "Invalid pagination", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = courses::fetch_courses(&state.db, &params).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/courses/deleted",
    responses((status = 200, description = "Deleted courses", body = Vec<Course>)),
    tag = "Courses"
)]
pub async fn list_deleted_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = db::list_deleted::<Course>(&state.db).await?;
    Ok(Json(courses))
}

/// Search courses by name
///
/// Matching ignores case for ASCII letters only.
#[utoipa::path(
    get,
    path = "/courses/search",
    params(NameSearchParams),
    responses(
        (status = 200, description = "Matching courses", body = Vec<Course>),
        (status = 404, description = "No course matches", body = ErrorResponse),
        (status = 422, description = "Missing or blank name", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = courses::search_courses(&state.db, &params.name).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course missing or deleted", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = db::get_by_id::<Course>(&state.db, id).await?;
    Ok(Json(course))
}

#[utoipa::path(
    patch,
    path = "/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 404, description = "Course missing or deleted", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = courses::update_course(&state.db, id, req).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = Message),
        (status = 400, description = "Course already deleted", body = ErrorResponse),
        (status = 404, description = "Course missing", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::soft_delete::<Course>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Course {} deleted", id))))
}

#[utoipa::path(
    patch,
    path = "/courses/{id}/restore",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course restored", body = Message),
        (status = 400, description = "Course is not deleted", body = ErrorResponse),
        (status = 404, description = "Course missing", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn restore_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::restore::<Course>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Course {} restored", id))))
}

/// Students enrolled in the course
#[utoipa::path(
    get,
    path = "/courses/{id}/students",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<Student>),
        (status = 404, description = "Course missing or deleted", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
pub async fn course_students(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = enrollments::students_of_course(&state.db, id).await?;
    Ok(Json(students))
}
