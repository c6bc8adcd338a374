use sqlx::SqlitePool;
use tracing::info;

use crate::db::lifecycle::find_active;
use crate::error::AppError;
use crate::models::{Course, Enrollment, NewEnrollmentRequest, Period, Student};

fn duplicate_enrollment(student_id: i64, course_id: i64) -> String {
    format!("student {} is already enrolled in course {}", student_id, course_id)
}

/// Links a visible student to a visible course. The period, when given, must
/// be visible too.
pub async fn enroll(db: &SqlitePool, req: NewEnrollmentRequest) -> Result<Enrollment, AppError> {
    let mut tx = db.begin().await?;
    find_active::<Student>(&mut tx, req.student_id).await?;
    find_active::<Course>(&mut tx, req.course_id).await?;
    if let Some(period_id) = req.period_id {
        find_active::<Period>(&mut tx, period_id).await?;
    }

    sqlx::query("INSERT INTO enrollments (student_id, course_id, period_id) VALUES (?1, ?2, ?3)")
        .bind(req.student_id)
        .bind(req.course_id)
        .bind(req.period_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, || duplicate_enrollment(req.student_id, req.course_id))
        })?;
    tx.commit().await?;

    info!("enrolled student {} in course {}", req.student_id, req.course_id);

    Ok(Enrollment {
        student_id: req.student_id,
        course_id: req.course_id,
        period_id: req.period_id,
    })
}

pub async fn unenroll(db: &SqlitePool, student_id: i64, course_id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;
    let removed = sqlx::query("DELETE FROM enrollments WHERE student_id = ?1 AND course_id = ?2")
        .bind(student_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        return Err(AppError::NotFound(format!(
            "student {} is not enrolled in course {}",
            student_id, course_id
        )));
    }
    tx.commit().await?;

    info!("unenrolled student {} from course {}", student_id, course_id);
    Ok(())
}

pub async fn fetch_enrollments(
    db: &SqlitePool,
    period_id: Option<i64>,
) -> Result<Vec<Enrollment>, AppError> {
    let mut tx = db.begin().await?;
    let enrollments = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT student_id, course_id, period_id
        FROM enrollments
        WHERE ?1 IS NULL OR period_id = ?1
        ORDER BY student_id, course_id
        "#,
    )
    .bind(period_id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(enrollments)
}

/// Non-deleted courses the student is enrolled in.
pub async fn courses_of_student(db: &SqlitePool, student_id: i64) -> Result<Vec<Course>, AppError> {
    let mut tx = db.begin().await?;
    find_active::<Student>(&mut tx, student_id).await?;

    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT c.*
        FROM courses c
        JOIN enrollments e ON e.course_id = c.id
        WHERE e.student_id = ?1 AND c.is_deleted = 0
        ORDER BY c.id
        "#,
    )
    .bind(student_id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(courses)
}

/// Non-deleted students enrolled in the course.
pub async fn students_of_course(db: &SqlitePool, course_id: i64) -> Result<Vec<Student>, AppError> {
    let mut tx = db.begin().await?;
    find_active::<Course>(&mut tx, course_id).await?;

    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT s.*
        FROM students s
        JOIN enrollments e ON e.student_id = s.id
        WHERE e.course_id = ?1 AND s.is_deleted = 0
        ORDER BY s.id
        "#,
    )
    .bind(course_id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(students)
}
