//! REST API endpoints.
//!
//! Axum-based HTTP API over the birthday service: CRUD, the calendar and
//! sensor views, and reminder settings.

pub mod routes;
pub mod state;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::ValidationError;
use crate::service::ServiceError;
use routes::{birthdays, calendar, sensors, settings};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(e) => e.into(),
            ServiceError::NotFound(id) => ApiError::NotFound(format!("birthday '{}'", id)),
            ServiceError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Optional `?today=YYYY-MM-DD` override for date-dependent views.
#[derive(Debug, Default, Deserialize)]
pub struct TodayParams {
    pub today: Option<String>,
}

/// Parse a `YYYY-MM-DD` query value.
pub fn parse_query_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("Invalid {} (expected YYYY-MM-DD): {}", name, value))
    })
}

/// The reference day: the `today` parameter if given, else the local date.
pub fn resolve_today(params: &TodayParams) -> Result<NaiveDate, ApiError> {
    match params.today.as_deref() {
        Some(today) => parse_query_date("today", today),
        None => Ok(Local::now().date_naive()),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/birthdays",
            get(birthdays::list_birthdays).post(birthdays::create_birthday),
        )
        .route(
            "/api/birthdays/:id",
            get(birthdays::get_birthday)
                .patch(birthdays::update_birthday)
                .delete(birthdays::delete_birthday),
        )
        .route("/api/calendar", get(calendar::list_events))
        .route("/api/calendar/next", get(calendar::next_event))
        .route("/api/sensors", get(sensors::list_sensors))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origin; `*` allows any.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        Ok(layer.allow_origin(Any))
    } else {
        Ok(layer.allow_origin(origin.parse::<HeaderValue>()?))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_service_error_mapping() {
        let err: ApiError = ServiceError::NotFound("abc".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m.contains("abc")));

        let err: ApiError =
            ServiceError::Validation(ValidationError::InvalidDateFormat("x".to_string())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_resolve_today() {
        let params = TodayParams {
            today: Some("2025-06-10".to_string()),
        };
        assert_eq!(
            resolve_today(&params).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );

        let params = TodayParams {
            today: Some("10-06-2025".to_string()),
        };
        assert!(matches!(
            resolve_today(&params),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("http://localhost:3000").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(setup_test_state(Vec::new()).await);
        let (status, json) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let app = build_router(setup_test_state(Vec::new()).await);
        let (status, json) = get_json(app, "/api/birthdays/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing"));
    }
}
