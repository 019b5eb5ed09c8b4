// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exam notification routes.

use crate::error::{AppError, Result};
use crate::models::exam::parse_filter;
use crate::models::{
    Notification, NotificationCategory, NotificationFilter, NotificationType, Priority,
};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::{validate_date, ApiResponse};
use crate::time_utils::{format_date, format_utc_rfc3339};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/notifications", get(list_notifications))
}

/// Admin-only notification routes. The role gate is applied in routes/mod.rs.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notifications", post(create_notification))
        .route("/api/notifications/{id}", delete(delete_notification))
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub category: NotificationCategory,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[validate(custom(function = "validate_date"))]
    pub exam_date: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub last_date_to_apply: Option<String>,
    #[validate(url(message = "link must be a URL"))]
    pub link: Option<String>,
}

/// List notifications, newest first, optionally by exam type and category.
async fn list_notifications(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<NotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let filter = NotificationFilter {
        kind: parse_filter(query.kind.as_deref()).map_err(AppError::Validation)?,
        category: parse_filter(query.category.as_deref()).map_err(AppError::Validation)?,
    };
    let notifications = state.stores.notifications.find_many(&filter).await?;
    Ok(Json(ApiResponse::list(notifications)))
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Notification>>)> {
    let req = CreateNotificationRequest {
        title: req.title.trim().to_string(),
        ..req
    };
    req.validate()?;

    let now = state.clock.now();
    let notification = Notification {
        id: uuid::Uuid::new_v4().to_string(),
        title: req.title,
        message: req.message,
        kind: req.kind,
        category: req.category,
        date: req.date.unwrap_or_else(|| format_date(now)),
        priority: req.priority,
        exam_date: req.exam_date,
        last_date_to_apply: req.last_date_to_apply,
        link: req.link,
        created_at: format_utc_rfc3339(now),
    };

    state.stores.notifications.save(&notification).await?;
    tracing::info!(
        notification_id = %notification.id,
        kind = notification.kind.as_str(),
        "Notification created"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::data(notification))))
}

async fn delete_notification(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.stores.notifications.delete(&id).await? {
        return Err(AppError::NotFound(format!("Notification {}", id)));
    }
    tracing::info!(notification_id = %id, "Notification deleted");

    Ok(Json(ApiResponse::message(
        "Notification deleted successfully",
    )))
}
