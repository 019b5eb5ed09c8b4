// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal calendar routes. Every operation is scoped to the signed-in
//! identity; events owned by someone else are reported as not found.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::calendar::DEFAULT_EVENT_KIND;
use crate::models::{CalendarEvent, EventColor};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::routes::{validate_date, ApiResponse};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calendar", get(list_events).post(create_event))
        .route("/api/calendar/{id}", delete(delete_event))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(length(min = 1, max = 100, message = "label must be 1-100 characters"))]
    pub label: String,
    #[serde(default)]
    pub color: EventColor,
    #[serde(rename = "type")]
    #[validate(length(max = 30, message = "type must be at most 30 characters"))]
    pub kind: Option<String>,
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<CalendarEvent>>>> {
    let events = state.stores.calendar.find_for_user(&user.identity.id).await?;
    Ok(Json(ApiResponse::list(events)))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CalendarEvent>>)> {
    let req = CreateEventRequest {
        label: req.label.trim().to_string(),
        kind: req
            .kind
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()),
        ..req
    };
    req.validate()?;

    let now = format_utc_rfc3339(state.clock.now());
    let event = CalendarEvent {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.identity.id.clone(),
        date: req.date,
        label: req.label,
        color: req.color,
        kind: req.kind.unwrap_or_else(|| DEFAULT_EVENT_KIND.to_string()),
        created_at: now.clone(),
        updated_at: now,
    };

    state.stores.calendar.save(&event).await?;
    tracing::debug!(identity_id = %event.user_id, event_id = %event.id, "Calendar event created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(event).with_message("Event created successfully")),
    ))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state
        .stores
        .calendar
        .delete_owned(&id, &user.identity.id)
        .await?
    {
        return Err(AppError::NotFound(format!("Calendar event {}", id)));
    }
    tracing::debug!(identity_id = %user.identity.id, event_id = %id, "Calendar event deleted");

    Ok(Json(ApiResponse::message("Event deleted successfully")))
}
