use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;

pub const MAX_PAGE_SIZE: i64 = 100;

pub fn default_limit() -> i64 {
    MAX_PAGE_SIZE
}

/// Offset/limit window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Result<Self, AppError> {
        if skip < 0 {
            return Err(AppError::Validation(format!("skip must not be negative (got {})", skip)));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, limit
            )));
        }
        Ok(Self { skip, limit })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: MAX_PAGE_SIZE }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameSearchParams {
    /// Case-insensitive substring of the name
    pub name: String,
}

/// Confirmation body for delete / restore / unenroll.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
