use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::models::common::{Page, default_limit};
use crate::validation::{Validate, check_email, check_length, check_range};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub national_id: String,
    pub name: String,
    pub email: String,
    pub semester: i32,
    #[serde(skip)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewStudentRequest {
    pub national_id: String,
    pub name: String,
    pub email: String,
    #[serde(default = "default_semester")]
    pub semester: i32,
}

fn default_semester() -> i32 {
    1
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStudentRequest {
    pub national_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub semester: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQueryParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub include_deleted: bool,
    pub semester: Option<i32>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
}

impl StudentQueryParams {
    pub fn page(&self) -> Result<Page, AppError> {
        Page::new(self.skip, self.limit)
    }
}

impl Default for StudentQueryParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            include_deleted: false,
            semester: None,
            name: None,
        }
    }
}

fn check_national_id(value: &str) -> Result<(), AppError> {
    check_length("national_id", value, 5, 20)
}

fn check_name(value: &str) -> Result<(), AppError> {
    check_length("name", value, 1, 100)
}

fn check_semester(value: i32) -> Result<(), AppError> {
    check_range("semester", value.into(), 1, 10)
}

impl Validate for NewStudentRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_national_id(&self.national_id)?;
        check_name(&self.name)?;
        check_email("email", &self.email)?;
        check_semester(self.semester)
    }
}

impl Validate for UpdateStudentRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(national_id) = &self.national_id {
            check_national_id(national_id)?;
        }
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(email) = &self.email {
            check_email("email", email)?;
        }
        if let Some(semester) = self.semester {
            check_semester(semester)?;
        }
        Ok(())
    }
}

impl UpdateStudentRequest {
    pub fn apply_to(self, student: &mut Student) {
        if let Some(national_id) = self.national_id {
            student.national_id = national_id;
        }
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        if let Some(semester) = self.semester {
            student.semester = semester;
        }
    }
}
