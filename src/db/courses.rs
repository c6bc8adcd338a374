use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::db::push_contains;
use crate::db::lifecycle::find_active;
use crate::error::AppError;
use crate::models::{Course, CourseQueryParams, NewCourseRequest, UpdateCourseRequest};
use crate::validation::Validate;

fn duplicate_code(code: &str) -> String {
    format!("a course with code {} already exists", code)
}

pub async fn insert_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO courses (code, name, credits, schedule, is_deleted)
        VALUES (?1, ?2, ?3, ?4, 0)
        "#,
    )
    .bind(&req.code)
    .bind(&req.name)
    .bind(req.credits)
    .bind(&req.schedule)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, || duplicate_code(&req.code)))?
    .last_insert_rowid();
    tx.commit().await?;

    info!("created course {} ({})", id, req.code);

    Ok(Course {
        id,
        code: req.code,
        name: req.name,
        credits: req.credits,
        schedule: req.schedule,
        is_deleted: false,
    })
}

pub async fn fetch_courses(
    db: &SqlitePool,
    params: &CourseQueryParams,
) -> Result<Vec<Course>, AppError> {
    let page = params.page()?;

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM courses WHERE 1 = 1");
    if !params.include_deleted {
        query.push(" AND is_deleted = 0");
    }
    if let Some(credits) = params.credits {
        query.push(" AND credits = ").push_bind(credits);
    }
    if let Some(code) = &params.code {
        push_contains(&mut query, "code", code);
    }
    if let Some(name) = &params.name {
        push_contains(&mut query, "name", name);
    }
    query
        .push(" ORDER BY id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.skip);

    let mut tx = db.begin().await?;
    let courses = query.build_query_as::<Course>().fetch_all(&mut *tx).await?;
    tx.commit().await?;
    Ok(courses)
}

pub async fn search_courses(db: &SqlitePool, name: &str) -> Result<Vec<Course>, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM courses WHERE is_deleted = 0");
    push_contains(&mut query, "name", name);
    query.push(" ORDER BY id");

    let mut tx = db.begin().await?;
    let courses = query.build_query_as::<Course>().fetch_all(&mut *tx).await?;
    tx.commit().await?;

    if courses.is_empty() {
        return Err(AppError::NotFound(format!("no courses match '{}'", name)));
    }
    Ok(courses)
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Course, AppError> {
    req.validate()?;

    let mut tx = db.begin().await?;
    let mut current = find_active::<Course>(&mut tx, id).await?;
    req.apply_to(&mut current);

    sqlx::query(
        r#"
        UPDATE courses
        SET code = ?1,
            name = ?2,
            credits = ?3,
            schedule = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&current.code)
    .bind(&current.name)
    .bind(current.credits)
    .bind(&current.schedule)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, || duplicate_code(&current.code)))?;
    tx.commit().await?;

    info!("updated course {}", id);
    Ok(current)
}
