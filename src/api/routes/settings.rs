use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::config::{ReminderSettings, SettingsUpdate};

pub async fn get_settings(State(state): State<AppState>) -> Json<ReminderSettings> {
    Json(state.settings.read().await.clone())
}

/// Validate and apply new settings, then reissue the daily schedule.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ReminderSettings>, ApiError> {
    let mut settings = state.settings.write().await;
    let merged = settings.merged(&update)?;

    state
        .service
        .write()
        .await
        .set_default_reminder_days(merged.default_reminder_days.clone());
    state.scheduler.lock().await.schedule(merged.notification_time);

    info!(
        "Settings updated: notification_time={}, default_reminder_days={}",
        merged.notification_time, merged.default_reminder_days
    );
    *settings = merged.clone();
    Ok(Json(merged))
}
