use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{resolve_today, ApiError, TodayParams};
use crate::models::{BirthdayId, BirthdayRecord, EnrichedBirthday};
use crate::service::{BirthdayEdit, NewBirthday, ServiceError};

#[derive(Debug, Serialize)]
pub struct BirthdayListResponse {
    pub birthdays: Vec<EnrichedBirthday>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBirthday {
    pub id: BirthdayId,
    pub name: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct RemovedBirthday {
    pub removed: String,
}

pub async fn list_birthdays(
    State(state): State<AppState>,
    Query(params): Query<TodayParams>,
) -> Result<Json<BirthdayListResponse>, ApiError> {
    let today = resolve_today(&params)?;
    let birthdays = state.service.read().await.list(today);
    Ok(Json(BirthdayListResponse { birthdays }))
}

pub async fn create_birthday(
    State(state): State<AppState>,
    Json(input): Json<NewBirthday>,
) -> Result<(StatusCode, Json<CreatedBirthday>), ApiError> {
    let record = state.service.write().await.add(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedBirthday {
            id: record.id,
            name: record.name,
            date: record.date.to_display(),
        }),
    ))
}

pub async fn get_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TodayParams>,
) -> Result<Json<EnrichedBirthday>, ApiError> {
    let today = resolve_today(&params)?;
    let record = state
        .service
        .read()
        .await
        .get(&id)
        .ok_or(ServiceError::NotFound(id))?;
    Ok(Json(EnrichedBirthday::from_record(&record, today)))
}

pub async fn update_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<BirthdayEdit>,
) -> Result<Json<BirthdayRecord>, ApiError> {
    let record = state.service.write().await.edit(&id, edit).await?;
    Ok(Json(record))
}

pub async fn delete_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemovedBirthday>, ApiError> {
    if !state.service.write().await.remove(&id).await? {
        return Err(ServiceError::NotFound(id).into());
    }
    Ok(Json(RemovedBirthday { removed: id }))
}
