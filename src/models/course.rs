use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::models::common::{Page, default_limit};
use crate::validation::{Validate, check_length, check_range};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub schedule: String,
    #[serde(skip)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewCourseRequest {
    pub code: String,
    pub name: String,
    #[serde(default = "default_credits")]
    pub credits: i32,
    /// e.g. "Mon 08-10"
    #[serde(default)]
    pub schedule: String,
}

fn default_credits() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<i32>,
    pub schedule: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQueryParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub include_deleted: bool,
    pub credits: Option<i32>,
    /// Case-insensitive substring of the code
    pub code: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
}

impl CourseQueryParams {
    pub fn page(&self) -> Result<Page, AppError> {
        Page::new(self.skip, self.limit)
    }
}

impl Default for CourseQueryParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            include_deleted: false,
            credits: None,
            code: None,
            name: None,
        }
    }
}

fn check_code(value: &str) -> Result<(), AppError> {
    check_length("code", value, 2, 15)
}

fn check_name(value: &str) -> Result<(), AppError> {
    check_length("name", value, 1, 100)
}

fn check_credits(value: i32) -> Result<(), AppError> {
    check_range("credits", value.into(), 1, 10)
}

fn check_schedule(value: &str) -> Result<(), AppError> {
    check_length("schedule", value, 0, 50)
}

impl Validate for NewCourseRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_code(&self.code)?;
        check_name(&self.name)?;
        check_credits(self.credits)?;
        check_schedule(&self.schedule)
    }
}

impl Validate for UpdateCourseRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(code) = &self.code {
            check_code(code)?;
        }
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(credits) = self.credits {
            check_credits(credits)?;
        }
        if let Some(schedule) = &self.schedule {
            check_schedule(schedule)?;
        }
        Ok(())
    }
}

impl UpdateCourseRequest {
    pub fn apply_to(self, course: &mut Course) {
        if let Some(code) = self.code {
            course.code = code;
        }
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(credits) = self.credits {
            course.credits = credits;
        }
        if let Some(schedule) = self.schedule {
            course.schedule = schedule;
        }
    }
}
