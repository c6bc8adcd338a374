use utoipa::OpenApi;

use crate::api::{courses, enrollments, periods, students};

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        students::create_student,
        students::list_students,
        students::list_deleted_students,
        students::search_students,
        students::get_student,
        students::update_student,
        students::delete_student,
        students::restore_student,
        students::student_courses,
        courses::create_course,
        courses::list_courses,
        courses::list_deleted_courses,
        courses::search_courses,
        courses::get_course,
        courses::update_course,
        courses::delete_course,
        courses::restore_course,
        courses::course_students,
        periods::create_period,
        periods::list_periods,
        periods::list_deleted_periods,
        periods::get_period,
        periods::update_period,
        periods::delete_period,
        periods::restore_period,
        periods::activate_period,
        enrollments::create_enrollment,
        enrollments::list_enrollments,
        enrollments::delete_enrollment
    ),
    tags(
        (name = "Students", description = "Student records"),
        (name = "Courses", description = "Course catalog"),
        (name = "Periods", description = "Academic periods"),
        (name = "Enrollments", description = "Student-course enrollments"),
    ),
    info(
        title = "Registrar API",
        version = "1.0.0",
        description = "Students, courses, periods and enrollments with soft delete"
    )
)]
pub struct ApiDoc;
