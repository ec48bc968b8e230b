use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_query_date, resolve_today, ApiError, TodayParams};
use crate::entities::calendar::{self, CalendarEvent, CALENDAR_NAME};

#[derive(Debug, Deserialize)]
pub struct CalendarRangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarEventsResponse {
    pub calendar: &'static str,
    pub events: Vec<CalendarEvent>,
}

/// Events with `start <= date < end`.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<CalendarRangeParams>,
) -> Result<Json<CalendarEventsResponse>, ApiError> {
    let (Some(start), Some(end)) = (params.start.as_deref(), params.end.as_deref()) else {
        return Err(ApiError::BadRequest(
            "Both start and end are required".to_string(),
        ));
    };
    let start = parse_query_date("start", start)?;
    let end = parse_query_date("end", end)?;
    if end < start {
        return Err(ApiError::BadRequest(format!(
            "end ({}) is before start ({})",
            end, start
        )));
    }

    let records = state.service.read().await.records();
    Ok(Json(CalendarEventsResponse {
        calendar: CALENDAR_NAME,
        events: calendar::events_between(&records, start, end),
    }))
}

/// The soonest upcoming birthday, or `null` when there are none.
pub async fn next_event(
    State(state): State<AppState>,
    Query(params): Query<TodayParams>,
) -> Result<Json<Option<CalendarEvent>>, ApiError> {
    let today = resolve_today(&params)?;
    let records = state.service.read().await.records();
    Ok(Json(calendar::next_event(&records, today)))
}
