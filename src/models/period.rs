use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::models::common::{Page, default_limit};
use crate::validation::{Validate, check_range};

/// Academic period, e.g. 2025-1. At most one is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Period {
    pub id: i64,
    pub year: i32,
    pub number: i32,
    pub active: bool,
    #[serde(skip)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewPeriodRequest {
    pub year: i32,
    pub number: i32,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePeriodRequest {
    pub year: Option<i32>,
    pub number: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQueryParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub include_deleted: bool,
    pub year: Option<i32>,
    pub number: Option<i32>,
    pub active: Option<bool>,
}

impl PeriodQueryParams {
    pub fn page(&self) -> Result<Page, AppError> {
        Page::new(self.skip, self.limit)
    }
}

impl Default for PeriodQueryParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            include_deleted: false,
            year: None,
            number: None,
            active: None,
        }
    }
}

fn check_year(value: i32) -> Result<(), AppError> {
    check_range("year", value.into(), 2000, 2100)
}

fn check_number(value: i32) -> Result<(), AppError> {
    check_range("number", value.into(), 1, 3)
}

impl Validate for NewPeriodRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_year(self.year)?;
        check_number(self.number)
    }
}

impl Validate for UpdatePeriodRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(year) = self.year {
            check_year(year)?;
        }
        if let Some(number) = self.number {
            check_number(number)?;
        }
        Ok(())
    }
}

impl UpdatePeriodRequest {
    pub fn apply_to(self, period: &mut Period) {
        if let Some(year) = self.year {
            period.year = year;
        }
        if let Some(number) = self.number {
            period.number = number;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let ok = NewPeriodRequest { year: 2025, number: 3, active: false };
        assert!(ok.validate().is_ok());

        let bad_year = NewPeriodRequest { year: 1999, number: 1, active: false };
        assert!(bad_year.validate().is_err());

        let bad_number = NewPeriodRequest { year: 2025, number: 4, active: false };
        assert!(bad_number.validate().is_err());
    }

    #[test]
    fn active_is_not_patchable() {
        let res: Result<UpdatePeriodRequest, _> = serde_json::from_str(r#"{"active": true}"#);
        assert!(res.is_err());
    }
}
