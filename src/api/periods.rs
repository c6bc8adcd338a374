use axum::extract::State;
use axum::http::StatusCode;

use crate::api::extract::{Json, Path, Query};
use crate::db::{self, periods};
use crate::error::{AppError, ErrorResponse};
use crate::models::{Message, NewPeriodRequest, Period, PeriodQueryParams, UpdatePeriodRequest};
use crate::state::AppState;

/// Create a period. Creating it active deactivates every other period.
#[utoipa::path(
    post,
    path = "/periods",
    request_body = NewPeriodRequest,
    responses(
        (status = 201, description = "Period created", body = Period),
        (status = 409, description = "Year and number already used", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn create_period(
    State(state): State<AppState>,
    Json(req): Json<NewPeriodRequest>,
) -> Result<(StatusCode, Json<Period>), AppError> {
    let period = periods::insert_period(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

#[utoipa::path(
    get,
    path = "/periods",
    params(PeriodQueryParams),
    responses(
        (status = 200, description = "Page of periods", body = Vec<Period>),
        (status = 422, description = "Invalid pagination", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn list_periods(
    State(state): State<AppState>,
    Query(params): Query<PeriodQueryParams>,
) -> Result<Json<Vec<Period>>, AppError> {
    let periods = periods::fetch_periods(&state.db, &params).await?;
    Ok(Json(periods))
}

#[utoipa::path(
    get,
    path = "/periods/deleted",
    responses((status = 200, description = "Deleted periods", body = Vec<Period>)),
    tag = "Periods"
)]
pub async fn list_deleted_periods(
    State(state): State<AppState>,
) -> Result<Json<Vec<Period>>, AppError> {
    let periods = db::list_deleted::<Period>(&state.db).await?;
    Ok(Json(periods))
}

#[utoipa::path(
    get,
    path = "/periods/{id}",
    params(("id" = i64, Path, description = "Period id")),
    responses(
        (status = 200, description = "Period found", body = Period),
        (status = 404, description = "Period missing or deleted", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn get_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Period>, AppError> {
    let period = db::get_by_id::<Period>(&state.db, id).await?;
    Ok(Json(period))
}

#[utoipa::path(
    patch,
    path = "/periods/{id}",
    params(("id" = i64, Path, description = "Period id")),
    request_body = UpdatePeriodRequest,
    responses(
        (status = 200, description = "Period updated", body = Period),
        (status = 404, description = "Period missing or deleted", body = ErrorResponse),
        (status = 409, description = "Year and number already used", body = ErrorResponse),
        (status = 422, description = "Field constraint violated", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn update_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePeriodRequest>,
) -> Result<Json<Period>, AppError> {
    let period = periods::update_period(&state.db, id, req).await?;
    Ok(Json(period))
}

#[utoipa::path(
    delete,
    path = "/periods/{id}",
    params(("id" = i64, Path, description = "Period id")),
    responses(
        (status = 200, description = "Period deleted", body = Message),
        (status = 400, description = "Period already deleted", body = ErrorResponse),
        (status = 404, description = "Period missing", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn delete_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::soft_delete::<Period>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Period {} deleted", id))))
}

#[utoipa::path(
    patch,
    path = "/periods/{id}/restore",
    params(("id" = i64, Path, description = "Period id")),
    responses(
        (status = 200, description = "Period restored", body = Message),
        (status = 400, description = "Period is not deleted", body = ErrorResponse),
        (status = 404, description = "Period missing", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn restore_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    db::restore::<Period>(&state.db, id).await?;
    Ok(Json(Message::new(format!("Period {} restored", id))))
}

/// Make this the only active period
#[utoipa::path(
    patch,
    path = "/periods/{id}/activate",
    params(("id" = i64, Path, description = "Period id")),
    responses(
        (status = 200, description = "Period activated", body = Period),
        (status = 404, description = "Period missing or deleted", body = ErrorResponse)
    ),
    tag = "Periods"
)]
pub async fn activate_period(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Period>, AppError> {
    let period = periods::activate_period(&state.db, id).await?;
    Ok(Json(period))
}
