use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{resolve_today, ApiError, TodayParams};
use crate::entities::SensorState;

#[derive(Debug, Serialize)]
pub struct SensorsResponse {
    pub sensors: Vec<SensorState>,
}

pub async fn list_sensors(
    State(state): State<AppState>,
    Query(params): Query<TodayParams>,
) -> Result<Json<SensorsResponse>, ApiError> {
    let today = resolve_today(&params)?;
    Ok(Json(SensorsResponse {
        sensors: state.sensors.states(today),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::testing::{get_json, record, send_json, setup_test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_sensor_states() {
        let state = setup_test_state(vec![record("a1", "Alice", "15-06-1985")]).await;

        let (status, json) = get_json(build_router(state), "/api/sensors?today=2025-06-10").await;
        assert_eq!(status, StatusCode::OK);

        let sensors = json["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0]["unique_id"], "birthday_tracker_a1");
        assert_eq!(sensors[0]["unit_of_measurement"], "days");
        assert_eq!(sensors[0]["value"], 5);
        assert_eq!(sensors[0]["attributes"]["age_turning_ordinal"], "40th");
    }

    #[tokio::test]
    async fn test_sensors_follow_mutations() {
        let state = setup_test_state(Vec::new()).await;

        send_json(
            build_router(state.clone()),
            "POST",
            "/api/birthdays",
            Some(r#"{"name": "Bob", "date": "2-2"}"#),
        )
        .await;

        let (_, json) = get_json(build_router(state), "/api/sensors").await;
        let sensors = json["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_removed_sensor_reported_unavailable_once() {
        let state = setup_test_state(vec![
            record("a1", "Alice", "15-06-1985"),
            record("b2", "Bob", "2-2"),
        ])
        .await;

        let (status, _) =
            send_json(build_router(state.clone()), "DELETE", "/api/birthdays/a1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = get_json(build_router(state.clone()), "/api/sensors").await;
        let sensors = json["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0]["unique_id"], "birthday_tracker_b2");
        assert_eq!(sensors[0]["available"], true);
        assert_eq!(sensors[1]["unique_id"], "birthday_tracker_a1");
        assert_eq!(sensors[1]["available"], false);
        assert_eq!(sensors[1]["value"], serde_json::Value::Null);

        let (_, json) = get_json(build_router(state), "/api/sensors").await;
        let sensors = json["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0]["unique_id"], "birthday_tracker_b2");
    }
}
